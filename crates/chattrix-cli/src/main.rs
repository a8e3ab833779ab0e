//! chattrix - threaded discussion forum CLI
//!
//! A command-line front end for the chattrix forum engine: posts, likes and
//! two-level comment threads stored in a local JSON file.
//!
//! ## Quick Start
//!
//! ```bash
//! # Initialize in the current directory, with a few welcome posts
//! chattrix init --with-samples
//!
//! # Write a post and comment on it
//! chattrix post create --user ann --category 3 --title "Hello" --content "First post"
//! chattrix comment add 4 --user bo "Welcome!"
//!
//! # Browse
//! chattrix post list --popular
//! chattrix post show 4
//! ```

mod commands;

fn main() {
    if let Err(err) = commands::run() {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}
