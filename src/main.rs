//! Minimal operator CLI for generating and inspecting secure config
//! envelopes. Commands are intentionally small and auditable so operators
//! can see exactly how configuration material is handled.

use std::env;

use secureconfig_rs::config::{load_secure_config, provision_secure_config};
use secureconfig_rs::crypto::integrity::sha256_hex;

fn print_usage() {
    eprintln!("Commands:\n  encrypt-config <plain.json> <secureconfig.json>\n  decrypt-config <secureconfig.json>\n  checksum <data>");
}

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        print_usage();
        return;
    }

    match args[1].as_str() {
        "encrypt-config" => {
            if args.len() != 4 {
                return print_usage();
            }
            match provision_secure_config(&args[2], &args[3]) {
                Ok(envelope) => {
                    println!("wrote {} (checksum {})", args[3], envelope.checksum);
                }
                Err(err) => eprintln!("provisioning failed: {err}"),
            }
        }
        "decrypt-config" => {
            if args.len() != 3 {
                return print_usage();
            }
            match load_secure_config(&args[2]) {
                Ok(config) => {
                    let value = serde_json::Value::Object(config);
                    println!("{}", serde_json::to_string_pretty(&value).unwrap());
                }
                Err(err) => eprintln!("decryption failed: {err}"),
            }
        }
        "checksum" => {
            if args.len() != 3 {
                return print_usage();
            }
            println!("{}", sha256_hex(args[2].as_bytes()));
        }
        _ => print_usage(),
    }
}
