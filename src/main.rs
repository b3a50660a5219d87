use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;

use compact_float::{
    binary_decode, binary_encode, decimal_decode, encode, Decimal64, DecimalValue,
    MAX_ENCODED_SIZE,
};

#[derive(Parser)]
#[command(
    name = "cfloat",
    about = "Encode and decode compact floats (binary64 and decimal64)",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode a number and print the bytes as hex
    Encode {
        /// Decimal text such as 1.5, -2e-7, inf or nan
        #[arg(allow_hyphen_values = true)]
        value: String,
        /// Significant digits to keep (0 keeps all; ignored with --binary)
        #[arg(short, long, default_value_t = 0, allow_negative_numbers = true)]
        digits: i32,
        /// Treat the value as a binary64 double instead of a decimal64
        #[arg(short, long)]
        binary: bool,
    },
    /// Decode hex bytes (spaces allowed) and print the value
    Decode {
        /// Encoded bytes, e.g. "1e aa 94 d7 69"
        #[arg(num_args = 1.., required = true)]
        hex: Vec<String>,
        /// Decode to a binary64 double instead of a decimal64
        #[arg(short, long)]
        binary: bool,
    },
    /// Print the encodings of a few well-known values
    Demo,
}

fn format_hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(" ")
}

fn format_binary(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:08b}"))
        .collect::<Vec<_>>()
        .join(" ")
}

fn parse_hex(words: &[String]) -> Result<Vec<u8>> {
    let digits: String = words
        .iter()
        .flat_map(|w| w.split_whitespace())
        .map(|w| w.trim_start_matches("0x"))
        .collect();
    if let Some(bad) = digits.chars().find(|c| !c.is_ascii_hexdigit()) {
        bail!("non-hex character {bad:?} in {digits:?}");
    }
    if digits.len() % 2 != 0 {
        bail!("odd number of hex digits in {digits:?}");
    }
    (0..digits.len())
        .step_by(2)
        .map(|i| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .with_context(|| format!("invalid hex byte {:?}", &digits[i..i + 2]))
        })
        .collect()
}

fn parse_decimal64(text: &str) -> Result<Decimal64> {
    let value: DecimalValue = text
        .parse()
        .with_context(|| format!("parsing {text:?} as a decimal"))?;
    Decimal64::try_from(value).with_context(|| format!("{text} does not fit in a decimal64"))
}

fn run_encode(text: &str, digits: i32, binary: bool) -> Result<()> {
    let mut buf = [0u8; MAX_ENCODED_SIZE];
    let len = if binary {
        let value: f64 = text
            .parse()
            .with_context(|| format!("parsing {text:?} as a double"))?;
        binary_encode(value, &mut buf)?
    } else {
        encode(parse_decimal64(text)?, digits, &mut buf)?
    };
    debug!(len, "encoded");
    println!("{}", format_hex(&buf[..len]));
    Ok(())
}

fn run_decode(words: &[String], binary: bool) -> Result<()> {
    let bytes = parse_hex(words)?;
    let len = if binary {
        let (value, len) = binary_decode(&bytes).context("decoding compact float")?;
        println!("{value:e}");
        len
    } else {
        let (value, len) = decimal_decode(&bytes).context("decoding compact float")?;
        println!("{value}");
        len
    };
    println!("({len} of {} bytes)", bytes.len());
    Ok(())
}

fn run_demo() -> Result<()> {
    let examples = [
        ("1.0", 0),
        ("1.5", 0),
        ("0", 0),
        ("-0", 0),
        ("inf", 0),
        ("-inf", 0),
        ("nan", 0),
        ("snan", 0),
        ("8.8419305", 0),
        ("0.5935555", 4),
        ("9.999999999999999e369", 0),
    ];

    println!("=== Compact Float Encoding Demo (v{}) ===\n", compact_float::version());
    for (text, digits) in examples {
        let value = parse_decimal64(text)?;
        let mut buf = [0u8; MAX_ENCODED_SIZE];
        let len = encode(value, digits, &mut buf)?;
        let encoded = &buf[..len];

        if digits > 0 {
            println!("  {text} @ {digits} digits ->");
        } else {
            println!("  {text} ->");
        }
        println!("    Hex:    {}", format_hex(encoded));
        println!("    Binary: {}", format_binary(encoded));
        println!("    Bytes:  {len} (decimal64 is 8)");

        match decimal_decode(encoded) {
            Ok((back, _)) => println!("    Decodes to {back}"),
            Err(e) => println!("    Decode error: {e}"),
        }
        println!();
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("compact_float=warn".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Encode {
            value,
            digits,
            binary,
        } => run_encode(&value, digits, binary),
        Commands::Decode { hex, binary } => run_decode(&hex, binary),
        Commands::Demo => run_demo(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(text: &[&str]) -> Vec<String> {
        text.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_parse_hex() {
        assert_eq!(parse_hex(&words(&["06 0f"])).unwrap(), [0x06, 0x0f]);
        assert_eq!(parse_hex(&words(&["0x1e", "AA"])).unwrap(), [0x1e, 0xaa]);
        assert_eq!(parse_hex(&words(&["800", "2"])).unwrap(), [0x80, 0x02]);
    }

    #[test]
    fn test_parse_hex_rejects_non_hex() {
        // from_str_radix alone would take "+1" as a byte
        assert!(parse_hex(&words(&["+1"])).is_err());
        assert!(parse_hex(&words(&["0g"])).is_err());
        assert!(parse_hex(&words(&["abc"])).is_err());
    }
}
