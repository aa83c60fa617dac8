//! Command line interface for the `toxext-messages` demo binary.
//!
//! The binary negotiates two in-memory extension instances and transfers one
//! message between them; these options pick its size and the link limits.

use clap::Parser;

/// Command line arguments for the `toxext-messages` binary.
#[derive(Debug, Parser)]
#[command(
    name = "toxext-messages",
    version,
    about = "Transfer a large message between two loopback extension instances"
)]
pub struct Cli {
    /// Size of the message to send, in bytes.
    #[arg(short, long, default_value_t = 64 * 1024)]
    pub size: usize,

    /// Largest segment the loopback host carries, in bytes.
    #[arg(long, default_value_t = 1373)]
    pub segment_size: usize,

    /// Largest message the receiving instance accepts, in bytes.
    #[arg(long, default_value_t = 10 * 1024 * 1024)]
    pub max_receive: u64,
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::Cli;

    #[test]
    fn parses_transfer_options() {
        let cli = Cli::parse_from([
            "toxext-messages",
            "--size",
            "5000",
            "--segment-size",
            "100",
            "--max-receive",
            "4096",
        ]);
        assert_eq!(cli.size, 5000);
        assert_eq!(cli.segment_size, 100);
        assert_eq!(cli.max_receive, 4096);
    }

    #[test]
    fn applies_defaults() {
        let cli = Cli::parse_from(["toxext-messages"]);
        assert_eq!(cli.segment_size, 1373);
        assert_eq!(cli.max_receive, 10 * 1024 * 1024);
    }
}
