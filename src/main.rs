//! Console frame buffer identification utility.
//!
//! Queries the frame buffer driver behind `/dev/fb` (or the device given as
//! first argument) and prints a short mnemonic such as `cg3`, `gx/cg6` or
//! `leo/zx`, suitable for picking window system arguments from a login
//! script. With `-num` (or any prefix of it) the numeric type code follows
//! the name.
//!
//! Exit codes:
//! - 0: Frame buffer identified
//! - 1: Driver reported a type code this build has no name for (`unknown`)
//! - 2: Unable to open or query the device
//!
//! # Environment Variables
//!
//! - `DEBUG`: When set, enables debug output to stderr showing the device,
//!   each ioctl attempt and the decoded type code.

use std::env;
use std::process;

use constype::cli::{Args, render};
use constype::{Status, identify};

fn main() {
    let args = Args::parse(env::args_os().skip(1));
    let id = identify(&args.device);

    if let Status::Failed(err) = &id.status {
        eprintln!("{err:#}");
    }
    println!("{}", render(&id, args.show_num));

    process::exit(id.status.exit_code());
}
