use std::process;

use zinc_drv::{Config, Session};

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() != 1 {
        println!("usage: zincc <input.c>");
        process::exit(1);
    }

    let mut session = Session::new(Config::new(&args[0]));
    if let Err(e) = session.compile() {
        eprintln!("{:#}", e);
        process::exit(1);
    }
}
