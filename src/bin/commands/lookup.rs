use clap::Args;
use ipgeo::lens::ipinfo::IpInfoFetcher;
use ipgeo::lens::utils::OutputFormat;
use ipgeo::IpgeoConfig;
use std::io::Write;
use std::process::ExitCode;

/// Arguments for the lookup
#[derive(Args)]
pub struct LookupArgs {
    /// Output format: summary, details, table, json, json-pretty
    #[clap(short, long)]
    pub format: Option<OutputFormat>,

    /// Output as JSON (same as `--format json`)
    #[clap(long)]
    pub json: bool,
}

impl LookupArgs {
    /// Resolve the output format: `--json`, then `--format`, then configuration
    pub fn output_format(&self, config: &IpgeoConfig) -> OutputFormat {
        if self.json {
            return OutputFormat::Json;
        }
        self.format.unwrap_or(config.format)
    }
}

pub fn run(args: LookupArgs, config: &IpgeoConfig, fetcher: &IpInfoFetcher) -> ExitCode {
    let output_format = args.output_format(config);
    if report(fetcher, output_format, &mut std::io::stdout()) {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Write the lookup result, or the error message, to `out`.
///
/// Returns whether the lookup succeeded and was written out.
fn report(fetcher: &IpInfoFetcher, output_format: OutputFormat, out: &mut impl Write) -> bool {
    let (line, succeeded) = match fetcher.lookup(output_format) {
        Ok(output) => (output, true),
        Err(e) => (e.to_string(), false),
    };

    if let Err(e) = writeln!(out, "{}", line) {
        if e.kind() != std::io::ErrorKind::BrokenPipe {
            eprintln!("{e}");
        }
        return false;
    }
    succeeded
}
