//! Configuration for the huffpack command-line tool.
//!
//! Parses a subcommand plus flags by hand. Every option has a default so
//! the common cases need only file names.

use std::path::PathBuf;

use tracing::Level;

/// Default artifact path for `compress`.
pub const DEFAULT_ARTIFACT: &str = "./out.huf";

/// Default output path for `decompress`.
pub const DEFAULT_DECOMPRESSED: &str = "./decompressed.bin";

/// Default size of generated sample input.
pub const DEFAULT_SAMPLE_BYTES: usize = 64 * 1024;

/// What the tool should do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Compress the concatenation of `inputs` into one artifact
    Compress { inputs: Vec<PathBuf>, output: PathBuf },

    /// Restore the original bytes from an artifact
    Decompress { input: PathBuf, output: PathBuf },

    /// Print the code table the inputs would be encoded with
    Codes { inputs: Vec<PathBuf> },

    /// Print the Huffman tree the inputs produce
    Tree { inputs: Vec<PathBuf> },

    /// Write seeded sample input with mixed compressibility
    Sample {
        output: PathBuf,
        seed: u64,
        size_bytes: usize,
    },

    /// Print usage
    Help,
}

/// Complete configuration for one invocation.
#[derive(Debug, Clone)]
pub struct Config {
    /// Selected subcommand
    pub command: Command,

    /// Maximum level emitted by the log subscriber
    pub log_level: Level,

    /// Whether to print the resolved configuration
    pub print_config: bool,

    /// Whether to print the stats summary after compress/decompress
    pub print_stats: bool,
}

impl Config {
    /// Parse configuration from command-line arguments (without the program name).
    pub fn from_args(args: &[String]) -> Result<Self, String> {
        let mut subcommand: Option<String> = None;
        let mut positional: Vec<PathBuf> = Vec::new();
        let mut output: Option<PathBuf> = None;
        let mut seed: Option<u64> = None;
        let mut size_bytes: Option<usize> = None;
        let mut log_level = Level::WARN;
        let mut print_config = false;
        let mut print_stats = true;

        let mut i = 0;
        while i < args.len() {
            match args[i].as_str() {
                "--out" | "-o" => {
                    i += 1;
                    if i >= args.len() {
                        return Err("--out requires a path".to_string());
                    }
                    output = Some(PathBuf::from(&args[i]));
                }
                "--seed" => {
                    i += 1;
                    if i >= args.len() {
                        return Err("--seed requires a number".to_string());
                    }
                    seed = Some(args[i].parse().map_err(|_| "invalid seed")?);
                }
                "--size" => {
                    i += 1;
                    if i >= args.len() {
                        return Err("--size requires a number".to_string());
                    }
                    size_bytes = Some(args[i].parse().map_err(|_| "invalid size")?);
                }
                "--log-level" => {
                    i += 1;
                    if i >= args.len() {
                        return Err("--log-level requires a level".to_string());
                    }
                    log_level = args[i]
                        .parse()
                        .map_err(|_| format!("invalid log level: {}", args[i]))?;
                }
                "--print-config" => {
                    print_config = true;
                }
                "--no-stats" => {
                    print_stats = false;
                }
                "--help" | "-h" => {
                    subcommand = Some("help".to_string());
                }
                flag if flag.starts_with('-') && flag.len() > 1 => {
                    return Err(format!("unknown argument: {}", flag));
                }
                word => {
                    if subcommand.is_none() {
                        subcommand = Some(word.to_string());
                    } else {
                        positional.push(PathBuf::from(word));
                    }
                }
            }
            i += 1;
        }

        let command = match subcommand.as_deref() {
            None | Some("help") => Command::Help,
            Some("compress") => Command::Compress {
                inputs: require_inputs("compress", positional)?,
                output: output.unwrap_or_else(|| PathBuf::from(DEFAULT_ARTIFACT)),
            },
            Some("decompress") => {
                let mut inputs = require_inputs("decompress", positional)?;
                if inputs.len() > 1 {
                    return Err("decompress takes exactly one artifact".to_string());
                }
                Command::Decompress {
                    input: inputs.remove(0),
                    output: output.unwrap_or_else(|| PathBuf::from(DEFAULT_DECOMPRESSED)),
                }
            }
            Some("codes") => Command::Codes {
                inputs: require_inputs("codes", positional)?,
            },
            Some("tree") => Command::Tree {
                inputs: require_inputs("tree", positional)?,
            },
            Some("sample") => Command::Sample {
                output: output.ok_or("sample requires --out <PATH>")?,
                seed: seed.unwrap_or_else(time_seed),
                size_bytes: size_bytes.unwrap_or(DEFAULT_SAMPLE_BYTES),
            },
            Some(other) => return Err(format!("unknown command: {}", other)),
        };

        Ok(Config {
            command,
            log_level,
            print_config,
            print_stats,
        })
    }

    /// Print the configuration in human-readable form.
    pub fn print(&self) {
        println!("=== Configuration ===");
        match &self.command {
            Command::Compress { inputs, output } => {
                println!("Command: compress");
                println!("Selected files:");
                for input in inputs {
                    println!("  {}", input.display());
                }
                println!("Artifact: {}", output.display());
            }
            Command::Decompress { input, output } => {
                println!("Command: decompress");
                println!("Artifact: {}", input.display());
                println!("Output:   {}", output.display());
            }
            Command::Codes { inputs } | Command::Tree { inputs } => {
                let name = if matches!(self.command, Command::Codes { .. }) {
                    "codes"
                } else {
                    "tree"
                };
                println!("Command: {}", name);
                println!("Selected files:");
                for input in inputs {
                    println!("  {}", input.display());
                }
            }
            Command::Sample {
                output,
                seed,
                size_bytes,
            } => {
                println!("Command: sample");
                println!("Output: {}", output.display());
                println!("Seed: {}", seed);
                println!("Size: {} bytes ({} KiB)", size_bytes, size_bytes / 1024);
            }
            Command::Help => println!("Command: help"),
        }
        println!("Log level: {}", self.log_level);
        println!("Print stats: {}", self.print_stats);
        println!();
    }
}

fn require_inputs(command: &str, inputs: Vec<PathBuf>) -> Result<Vec<PathBuf>, String> {
    if inputs.is_empty() {
        Err(format!("{} requires at least one input file", command))
    } else {
        Ok(inputs)
    }
}

fn time_seed() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

pub fn print_help() {
    println!("huffpack: Huffman compression for arbitrary files");
    println!();
    println!("USAGE:");
    println!("    huffpack <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    compress <FILES...>     Compress the files, concatenated in order");
    println!("    decompress <ARTIFACT>   Restore the original bytes");
    println!("    codes <FILES...>        Print the code table for the files");
    println!("    tree <FILES...>         Print the Huffman tree for the files");
    println!("    sample                  Write sample input (requires --out)");
    println!();
    println!("OPTIONS:");
    println!(
        "    --out, -o <PATH>        Output path (compress: {}, decompress: {})",
        DEFAULT_ARTIFACT, DEFAULT_DECOMPRESSED
    );
    println!("    --seed <N>              Sample seed (default: time-based)");
    println!(
        "    --size <N>              Sample size in bytes (default: {})",
        DEFAULT_SAMPLE_BYTES
    );
    println!("    --log-level <LEVEL>     trace, debug, info, warn, error (default: warn)");
    println!("    --print-config          Print resolved configuration");
    println!("    --no-stats              Don't print the summary");
    println!("    --help, -h              Print this help");
    println!();
    println!("EXAMPLES:");
    println!("    huffpack compress a.bin b.bin --out both.huf");
    println!("    huffpack decompress both.huf --out both.bin");
    println!("    huffpack codes notes.txt");
    println!("    huffpack sample --out sample.bin --seed 42");
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_no_args_is_help() {
        let config = Config::from_args(&[]).unwrap();
        assert_eq!(config.command, Command::Help);
    }

    #[test]
    fn test_compress_defaults() {
        let config = Config::from_args(&args(&["compress", "a.bin", "b.bin"])).unwrap();
        assert_eq!(
            config.command,
            Command::Compress {
                inputs: vec![PathBuf::from("a.bin"), PathBuf::from("b.bin")],
                output: PathBuf::from(DEFAULT_ARTIFACT),
            }
        );
        assert_eq!(config.log_level, Level::WARN);
        assert!(config.print_stats);
    }

    #[test]
    fn test_decompress_with_out() {
        let argv = args(&["decompress", "x.huf", "-o", "x.bin", "--no-stats"]);
        let config = Config::from_args(&argv).unwrap();
        assert_eq!(
            config.command,
            Command::Decompress {
                input: PathBuf::from("x.huf"),
                output: PathBuf::from("x.bin"),
            }
        );
        assert!(!config.print_stats);
    }

    #[test]
    fn test_decompress_rejects_two_inputs() {
        assert!(Config::from_args(&args(&["decompress", "a", "b"])).is_err());
    }

    #[test]
    fn test_missing_inputs() {
        let err = Config::from_args(&args(&["codes"])).unwrap_err();
        assert!(err.contains("at least one input"));
    }

    #[test]
    fn test_sample_requires_out() {
        assert!(Config::from_args(&args(&["sample"])).is_err());

        let argv = args(&["sample", "--out", "s.bin", "--seed", "7", "--size", "100"]);
        let config = Config::from_args(&argv).unwrap();
        assert_eq!(
            config.command,
            Command::Sample {
                output: PathBuf::from("s.bin"),
                seed: 7,
                size_bytes: 100,
            }
        );
    }

    #[test]
    fn test_log_level() {
        let config = Config::from_args(&args(&["tree", "f", "--log-level", "debug"])).unwrap();
        assert_eq!(config.log_level, Level::DEBUG);

        assert!(Config::from_args(&args(&["tree", "f", "--log-level", "loud"])).is_err());
    }

    #[test]
    fn test_unknown_flag_and_command() {
        assert!(Config::from_args(&args(&["compress", "f", "--bogus"])).is_err());
        assert!(Config::from_args(&args(&["explode"])).is_err());
    }
}
