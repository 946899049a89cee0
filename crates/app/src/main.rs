//! huffpack: command-line front end for the huffpack codec.
//!
//! ## Usage
//!
//! ```bash
//! # Compress two files into one artifact
//! huffpack compress a.bin b.bin --out both.huf
//!
//! # Restore them (concatenated)
//! huffpack decompress both.huf --out both.bin
//!
//! # Inspect the code table or tree
//! huffpack codes notes.txt
//! huffpack tree notes.txt
//! ```

mod config;
mod sample;

use std::process::ExitCode;

use huffpack_core::codec::{self, compress_files, decompress_file, read_sources};
use huffpack_core::{Error, Stats};
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use crate::config::{print_help, Command, Config};

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let config = match Config::from_args(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            eprintln!("run `huffpack --help` for usage");
            return ExitCode::from(2);
        }
    };

    init_logging(config.log_level);

    if config.print_config {
        config.print();
    }

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "command failed");
            eprintln!("error: {}", user_message(&e));
            ExitCode::FAILURE
        }
    }
}

fn init_logging(level: Level) {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("warning: could not install log subscriber: {}", e);
    }
}

/// Execute one command.
fn run(config: &Config) -> huffpack_core::Result<()> {
    match &config.command {
        Command::Help => print_help(),

        Command::Compress { inputs, output } => {
            let mut stats = Stats::new();
            let encoded = compress_files(inputs.as_slice(), output)?;
            stats.record_artifact(&encoded.artifact);
            stats.record_codes(&encoded.codes);
            stats.complete();

            println!("Compressed {} file(s) into {}", inputs.len(), output.display());
            if config.print_stats {
                stats.print_summary();
            }
        }

        Command::Decompress { input, output } => {
            let mut stats = Stats::new();
            let artifact = decompress_file(input, output)?;
            stats.record_artifact(&artifact);
            stats.complete();

            println!("Decompressed {} into {}", input.display(), output.display());
            if config.print_stats {
                stats.print_summary();
            }
        }

        Command::Codes { inputs } => {
            let encoded = codec::encode(&read_sources(inputs.as_slice())?)?;
            if encoded.codes.is_empty() {
                println!("(empty input: no codes)");
            } else {
                println!("Huffman Codes:");
                print!("{}", encoded.codes);
            }
        }

        Command::Tree { inputs } => {
            let encoded = codec::encode(&read_sources(inputs.as_slice())?)?;
            match &encoded.tree {
                Some(tree) => {
                    println!(
                        "Huffman Tree ({} leaves, depth {}):",
                        tree.leaf_count(),
                        tree.depth()
                    );
                    print!("{}", tree.render());
                }
                None => println!("(empty input: no tree)"),
            }
        }

        Command::Sample {
            output,
            seed,
            size_bytes,
        } => {
            sample::write_sample_file(output, *seed, *size_bytes)?;
            info!(seed, size_bytes, path = %output.display(), "wrote sample input");
            println!(
                "Wrote {} bytes of sample data (seed {}) to {}",
                size_bytes,
                seed,
                output.display()
            );
        }
    }

    Ok(())
}

/// Translate a codec error into a message for the user.
fn user_message(err: &Error) -> String {
    match err {
        Error::Io(e) => format!("file access failed: {}", e),
        Error::Artifact(e) => format!("not a valid huffpack artifact ({})", e),
        Error::TruncatedCode { .. } | Error::BitIo(_) | Error::Huffman(_) => {
            format!("artifact contents do not decode: {}", err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn config(command: Command) -> Config {
        Config {
            command,
            log_level: Level::WARN,
            print_config: false,
            print_stats: false,
        }
    }

    #[test]
    fn test_compress_then_decompress() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.txt");
        let b = dir.path().join("b.bin");
        std::fs::write(&a, b"first file, some text\n").unwrap();
        std::fs::write(&b, [0u8, 1, 2, 3, 255, 254]).unwrap();

        let artifact = dir.path().join("out.huf");
        let restored = dir.path().join("restored.bin");

        run(&config(Command::Compress {
            inputs: vec![a.clone(), b.clone()],
            output: artifact.clone(),
        }))
        .unwrap();
        run(&config(Command::Decompress {
            input: artifact,
            output: restored.clone(),
        }))
        .unwrap();

        let mut expected = std::fs::read(&a).unwrap();
        expected.extend(std::fs::read(&b).unwrap());
        assert_eq!(std::fs::read(&restored).unwrap(), expected);
    }

    #[test]
    fn test_missing_input_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = run(&config(Command::Compress {
            inputs: vec![dir.path().join("nope")],
            output: dir.path().join("out.huf"),
        }))
        .unwrap_err();

        assert!(matches!(err, Error::Io(_)));
        assert!(user_message(&err).starts_with("file access failed"));
    }

    #[test]
    fn test_corrupt_artifact_message() {
        let dir = tempfile::tempdir().unwrap();
        let bogus = dir.path().join("bogus.huf");
        std::fs::write(&bogus, b"definitely not an artifact, but long enough to parse").unwrap();

        let err = run(&config(Command::Decompress {
            input: bogus,
            output: dir.path().join("never.bin"),
        }))
        .unwrap_err();

        assert!(err.is_corrupt_artifact());
        assert!(user_message(&err).starts_with("not a valid huffpack artifact"));
        assert!(!dir.path().join("never.bin").exists());
    }

    #[test]
    fn test_inconsistent_payload_message() {
        use huffpack_core::{Artifact, FrequencyTable};

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mismatch.huf");
        let table = FrequencyTable::from_bytes(b"aabc");
        let artifact = Artifact::new(table, 6, vec![0]).unwrap();
        std::fs::write(&path, artifact.to_bytes()).unwrap();

        let err = run(&config(Command::Decompress {
            input: path,
            output: dir.path().join("never.bin"),
        }))
        .unwrap_err();

        assert!(err.is_corrupt_artifact());
        assert!(user_message(&err).starts_with("not a valid huffpack artifact"));
        assert!(!dir.path().join("never.bin").exists());
    }

    #[test]
    fn test_sample_then_codes_and_tree() {
        let dir = tempfile::tempdir().unwrap();
        let path: PathBuf = dir.path().join("sample.bin");

        run(&config(Command::Sample {
            output: path.clone(),
            seed: 3,
            size_bytes: 10_000,
        }))
        .unwrap();
        assert_eq!(std::fs::metadata(&path).unwrap().len(), 10_000);

        run(&config(Command::Codes { inputs: vec![path.clone()] })).unwrap();
        run(&config(Command::Tree { inputs: vec![path] })).unwrap();
    }
}
