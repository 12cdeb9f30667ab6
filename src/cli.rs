use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "webpdf")]
#[command(
    version,
    about = "Render a web page in headless Chrome and save it as a PDF",
    long_about = "webpdf\n\nLoads URL in a headless Chrome/Chromium, waits until the network is almost idle (at most two connections for 500 ms), and prints the page to OUTPUT as a Letter-size PDF. An existing OUTPUT is overwritten; its directory must already exist.\n\nDefaults (paper format, wait condition, timeouts, browser binary) can be changed in a TOML config file."
)]
pub struct Cli {
    #[arg(help = "URL to render")]
    pub url: String,

    #[arg(help = "Path of the PDF to write")]
    pub output: PathBuf,

    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(
        long,
        global = true,
        value_name = "PATH",
        help = "Optional config file (TOML) for paper format, wait condition, timeouts and browser settings"
    )]
    pub config: Option<PathBuf>,
}

pub fn parse() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::Cli;
    use clap::error::ErrorKind;
    use clap::Parser;
    use std::path::Path;

    #[test]
    fn positional_arguments_are_parsed() {
        let cli = Cli::parse_from(["webpdf", "https://example.com", "out.pdf"]);

        assert_eq!(cli.url, "https://example.com");
        assert_eq!(cli.output, Path::new("out.pdf"));
        assert!(!cli.verbose);
        assert!(cli.config.is_none());
    }

    #[test]
    fn flags_are_accepted_around_positionals() {
        let cli = Cli::parse_from([
            "webpdf",
            "--verbose",
            "https://example.com",
            "out.pdf",
            "--config",
            "webpdf.toml",
        ]);

        assert!(cli.verbose);
        assert_eq!(cli.config.as_deref(), Some(Path::new("webpdf.toml")));
        assert_eq!(cli.output, Path::new("out.pdf"));
    }

    #[test]
    fn missing_output_is_rejected() {
        let err = Cli::try_parse_from(["webpdf", "https://example.com"])
            .err()
            .expect("one argument must not parse");
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn missing_both_arguments_is_rejected() {
        let err = Cli::try_parse_from(["webpdf"])
            .err()
            .expect("zero arguments must not parse");
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn extra_positional_is_rejected() {
        assert!(Cli::try_parse_from(["webpdf", "https://example.com", "a.pdf", "b.pdf"]).is_err());
    }
}
