use cirrus::{cli, ui};

fn main() {
    if let Err(e) = cli::run() {
        ui::error(format!("{:#}", e));
        std::process::exit(1);
    }
}
