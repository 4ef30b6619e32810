// Copyright 2026 The lined Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! edlin - a minimal read-eval loop showing off lined.
//!
//! Type `exit` to quit, `password` to read the next line silently.
//! Ctrl-D on an empty line also quits.

use std::io::{self, Write};
use std::process;

use lined::{Error, Reader};

fn print_usage() {
    eprintln!("usage: edlin [--prompt <text>]");
}

fn main() {
    let mut prompt = String::from("prompt> ");
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--prompt" => match args.next() {
                Some(v) => prompt = v,
                None => {
                    print_usage();
                    process::exit(255);
                }
            },
            _ => {
                print_usage();
                process::exit(255);
            }
        }
    }

    let reader = Reader::new();
    let mut pass = false;
    loop {
        let this_prompt = if pass { "password> " } else { prompt.as_str() };
        print!("{}", this_prompt);
        let _ = io::stdout().flush();

        let result = if pass {
            pass = false;
            reader.read_password()
        } else {
            reader.read_string()
        };

        let line = match result {
            Ok(line) => line,
            Err(Error::EndOfInput(partial)) => {
                println!();
                if partial.is_empty() {
                    process::exit(0);
                }
                // The unfinished line stays buffered; let the user
                // pick it back up.
                println!("no auto-fill suggestions");
                continue;
            }
            Err(err) => {
                println!();
                eprintln!("failed to read line: {}", err);
                process::exit(1);
            }
        };

        match line.trim_end_matches('\n') {
            "exit" => {
                println!("exiting");
                process::exit(0);
            }
            "password" => pass = true,
            _ => println!("read [{:?}]", line),
        }
    }
}
