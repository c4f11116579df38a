use std::path::PathBuf;

mod keymap;
mod run;

fn main() {
    env_logger::init();
    let rom = std::env::args_os().nth(1).expect("usage: vip8 <rom>");
    run::run(PathBuf::from(rom));
}
