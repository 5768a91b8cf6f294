//! cli::parser
//!
//! Tokenizes raw argv into the loosely typed invocation model.
//!
//! # Grammar
//!
//! ```text
//! cirrus <service> <operation> [help] [--Flag value...]*
//! ```
//!
//! Service and operation names live in the runtime catalog, so the
//! tokenizer cannot know them; it only separates positionals from
//! `--Flag` groups. A flag owns every following token up to the next
//! flag, which is how multi-valued parameters are expressed. A flag with
//! no following value (e.g. `--secure`) carries an empty value list.
//!
//! Cross-cutting flags (`--version`, `--output`, `--secure`,
//! `--profile`) and the identity/endpoint overrides the transport layer
//! owns are extracted from the map before binding; what remains is
//! schema input.

use std::collections::BTreeMap;

/// Parsed flag input: normalized flag name (leading `--` stripped) to
/// its ordered value list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyValueMap {
    entries: BTreeMap<String, Vec<String>>,
}

impl KeyValueMap {
    /// Normalize a raw flag token: strip the leading marker.
    pub fn normalize(key: &str) -> &str {
        key.trim_start_matches('-')
    }

    pub fn insert(&mut self, key: &str, values: Vec<String>) {
        self.entries.insert(Self::normalize(key).to_string(), values);
    }

    /// The full value list for a key.
    pub fn values(&self, key: &str) -> Option<&[String]> {
        self.entries.get(Self::normalize(key)).map(Vec::as_slice)
    }

    /// The authoritative (first) value for a key.
    pub fn first(&self, key: &str) -> Option<&str> {
        self.values(key)?.first().map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(Self::normalize(key))
    }

    /// Remove a key, returning its first value.
    pub fn take_first(&mut self, key: &str) -> Option<String> {
        self.entries
            .remove(Self::normalize(key))
            .and_then(|mut values| {
                if values.is_empty() {
                    None
                } else {
                    Some(values.remove(0))
                }
            })
    }

    /// Remove a key regardless of value arity; true if it was present.
    pub fn take_flag(&mut self, key: &str) -> bool {
        self.entries.remove(Self::normalize(key)).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
        self.entries.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Cross-cutting flags consumed before binding.
#[derive(Debug, Clone, Default)]
pub struct GlobalFlags {
    /// Explicit API version override.
    pub version: Option<String>,
    /// Output format name (resolved against the profile later).
    pub output: Option<String>,
    /// Force HTTPS.
    pub secure: bool,
    /// Named profile selection.
    pub profile: Option<String>,
    /// Identity overrides the transport layer consumes.
    pub access_key_id: Option<String>,
    pub access_key_secret: Option<String>,
    /// Per-invocation endpoint override.
    pub endpoint: Option<String>,
}

impl GlobalFlags {
    /// Extract the cross-cutting flags out of a parsed map.
    pub fn take_from(map: &mut KeyValueMap) -> Self {
        Self {
            version: map.take_first("version"),
            output: map.take_first("output"),
            secure: map.take_flag("secure"),
            profile: map.take_first("profile"),
            access_key_id: map.take_first("AccessKeyId"),
            access_key_secret: map.take_first("AccessKeySecret"),
            endpoint: map.take_first("Endpoint"),
        }
    }
}

/// One tokenized command line.
#[derive(Debug, Clone, Default)]
pub struct Invocation {
    /// First positional: the service (or meta/bespoke command) token.
    pub service: Option<String>,
    /// Second positional: the operation token.
    pub operation: Option<String>,
    /// A literal `help` third token requests parameter help.
    pub wants_parameter_help: bool,
    /// The parsed flag input.
    pub map: KeyValueMap,
    /// Everything after the service token, verbatim, for extension
    /// handlers that parse their own arguments.
    pub raw_operation_args: Vec<String>,
}

/// Tokenize argv (without the program name).
pub fn parse(args: &[String]) -> Invocation {
    let mut invocation = Invocation::default();

    let mut index = 0;
    if let Some(first) = args.first() {
        invocation.service = Some(first.clone());
        invocation.raw_operation_args = args[1..].to_vec();
        index = 1;
        if let Some(second) = args.get(1) {
            if !second.starts_with("--") {
                invocation.operation = Some(second.clone());
                index = 2;
                if args.get(2).map(String::as_str) == Some("help") {
                    invocation.wants_parameter_help = true;
                    index = 3;
                }
            }
        }
    }

    while index < args.len() {
        let token = &args[index];
        if !token.starts_with("--") {
            // Stray positional between flags; skip it like any other
            // token the grammar has no slot for.
            index += 1;
            continue;
        }
        let key = token.clone();
        let mut values = Vec::new();
        index += 1;
        while index < args.len() && !args[index].starts_with("--") {
            values.push(args[index].clone());
            index += 1;
        }
        invocation.map.insert(&key, values);
    }

    invocation
}
