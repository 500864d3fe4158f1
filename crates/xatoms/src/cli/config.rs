use clap::{ArgAction, CommandFactory, Parser, error::ErrorKind};
use core::num::NonZeroUsize;
use xatoms_core::{
    AtomRange, DEFAULT_BATCH_SIZE, DEFAULT_FORMAT, DEFAULT_MAX_NAME_LEN, Error, MatchSpec,
    ScanConfig, Template,
};

/// Command line for the `xatoms` binary.
///
/// The first group of options shapes what is printed; the second group tunes
/// how the display is queried. Tuning options can also be set through
/// environment variables.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "xatoms",
    version,
    disable_version_flag = true,
    about = "List the atoms registered on an X11 display",
    after_help = "Examples:\n  \
        xatoms --name=NET_WM -p      atoms whose name contains NET_WM\n  \
        xatoms --range=-20           atoms 0 to 20\n  \
        xatoms --range=300-          atoms 300 onward\n  \
        xatoms --range=300-400       atoms 300 to 400\n  \
        xatoms -f '%s=%d\\n'          name first, then id"
)]
pub struct CliArgs {
    /// Output format, printf style.
    ///
    /// `%d` is the atom id, `%s` the atom name and `%%` a literal percent.
    /// `\n`, `\t` and `\r` are expanded.
    #[arg(short, long, default_value = DEFAULT_FORMAT, allow_hyphen_values = true)]
    pub format: String,

    /// Name of the atom to look for. Exact match unless `--partial` is set.
    #[arg(short, long)]
    pub name: Option<String>,

    /// Match `--name` anywhere in the atom name.
    #[arg(short, long, default_value_t = false)]
    pub partial: bool,

    /// Range of atoms to scan, as `low-high`. Either bound may be omitted.
    ///
    /// `-20` scans 0 to 20, `300-` scans from 300 to the default ceiling.
    #[arg(
        short,
        long,
        allow_hyphen_values = true,
        value_parser = clap::value_parser!(AtomRange)
    )]
    pub range: Option<AtomRange>,

    /// Number of lookups kept in flight at once. Must be at least 1.
    ///
    /// Environment variable: `XATOMS_BATCH_SIZE`
    #[arg(short, long, env = "XATOMS_BATCH_SIZE", default_value_t = DEFAULT_BATCH_SIZE)]
    pub batch_size: NonZeroUsize,

    /// X display to connect to. Defaults to `$DISPLAY`.
    #[arg(short, long)]
    pub display: Option<String>,

    /// Stop at the first atom that has no name instead of scanning the whole
    /// range. The reserved atom 0 is looked past.
    ///
    /// Environment variable: `XATOMS_STOP_AT_UNKNOWN`
    #[arg(long, env = "XATOMS_STOP_AT_UNKNOWN", default_value_t = false)]
    pub stop_at_unknown: bool,

    /// Skip names shorter than this many bytes.
    ///
    /// Environment variable: `XATOMS_MIN_NAME_LEN`
    #[arg(long, env = "XATOMS_MIN_NAME_LEN", default_value_t = 0)]
    pub min_name_len: usize,

    /// Abort when a name is longer than this many bytes.
    ///
    /// Environment variable: `XATOMS_MAX_NAME_LEN`
    #[arg(long, env = "XATOMS_MAX_NAME_LEN", default_value_t = DEFAULT_MAX_NAME_LEN)]
    pub max_name_len: usize,

    /// Print version information.
    #[arg(short = 'v', long, action = ArgAction::Version)]
    #[allow(dead_code)]
    version: Option<bool>,
}

/// Validated settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub display: Option<String>,
    pub scan: ScanConfig,
}

impl RunConfig {
    /// Validates `args`, reporting a rejection the way clap reports its own
    /// argument errors.
    pub fn from_args(args: CliArgs) -> Result<Self, clap::Error> {
        Self::try_from(args).map_err(|e| CliArgs::command().error(ErrorKind::ArgumentConflict, e))
    }
}

impl TryFrom<CliArgs> for RunConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        if args.min_name_len > args.max_name_len {
            return Err(Error::InvalidConfig {
                reason: format!(
                    "--min-name-len ({}) exceeds --max-name-len ({})",
                    args.min_name_len, args.max_name_len
                ),
            }
            .into());
        }

        Ok(Self {
            display: args.display,
            scan: ScanConfig {
                range: args.range.unwrap_or_default(),
                matcher: MatchSpec::from_flags(args.name.as_deref(), args.partial),
                template: Template::parse(&args.format),
                batch_size: args.batch_size,
                max_name_len: args.max_name_len,
                min_name_len: args.min_name_len,
                stop_at_unknown: args.stop_at_unknown,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> anyhow::Result<RunConfig> {
        let args = CliArgs::try_parse_from(core::iter::once("xatoms").chain(args.iter().copied()))?;
        RunConfig::try_from(args)
    }

    fn parse_err(args: &[&str]) -> clap::Error {
        CliArgs::try_parse_from(core::iter::once("xatoms").chain(args.iter().copied()))
            .unwrap_err()
    }

    #[test]
    fn defaults_match_core_defaults() {
        let config = parse(&[]).unwrap();
        assert_eq!(config.display, None);
        assert_eq!(config.scan, ScanConfig::default());
    }

    #[test]
    fn name_implies_full_match() {
        let config = parse(&["--name", "WM_CLASS"]).unwrap();
        assert_eq!(config.scan.matcher, MatchSpec::Full(b"WM_CLASS".to_vec()));
    }

    #[test]
    fn partial_flag_in_any_position() {
        for args in [["-n", "NET_WM", "-p"], ["-p", "-n", "NET_WM"]] {
            let config = parse(&args).unwrap();
            assert_eq!(config.scan.matcher, MatchSpec::Partial(b"NET_WM".to_vec()));
        }
        assert_eq!(
            parse(&["--name=NET_WM", "-p"]).unwrap().scan.matcher,
            MatchSpec::Partial(b"NET_WM".to_vec())
        );
    }

    #[test]
    fn range_forms() {
        let cases = [
            (vec!["-r", "-20"], AtomRange::new(0, 20)),
            (vec!["--range=-20"], AtomRange::new(0, 20)),
            (vec!["--range", "300-"], AtomRange::new(300, 65_535)),
            (vec!["-r", "300-400"], AtomRange::new(300, 400)),
            (vec!["-r", "400-300"], AtomRange::new(400, 400)),
        ];
        for (args, expected) in cases {
            assert_eq!(parse(&args).unwrap().scan.range, expected, "{args:?}");
        }
    }

    #[test]
    fn bad_range_is_a_usage_error() {
        for raw in ["ten-twenty", "1-99999999999", "5-x"] {
            let err = parse_err(&["-r", raw]);
            assert_eq!(err.kind(), ErrorKind::ValueValidation, "{raw:?}");
            assert!(err.use_stderr(), "{raw:?}");
        }
        let rendered = parse_err(&["-r", "ten-twenty"]).to_string();
        assert!(rendered.contains("ten-twenty"), "{rendered}");
        assert!(rendered.contains("--help"), "{rendered}");
    }

    #[test]
    fn format_escapes_are_expanded() {
        let config = parse(&["-f", r"%d=%s;\n"]).unwrap();
        let mut out = Vec::new();
        config.scan.template.render(&mut out, 42, b"FOO").unwrap();
        assert_eq!(out, b"42=FOO;\n");
    }

    #[test]
    fn tuning_options() {
        let config = parse(&[
            "-b",
            "7",
            "-d",
            ":1",
            "--stop-at-unknown",
            "--min-name-len",
            "2",
            "--max-name-len",
            "64",
        ])
        .unwrap();
        assert_eq!(config.display.as_deref(), Some(":1"));
        assert_eq!(config.scan.batch_size.get(), 7);
        assert!(config.scan.stop_at_unknown);
        assert_eq!(config.scan.min_name_len, 2);
        assert_eq!(config.scan.max_name_len, 64);
    }

    #[test]
    fn zero_batch_size_is_a_usage_error() {
        for args in [["--batch-size", "0"], ["-b", "none"]] {
            let err = parse_err(&args);
            assert_eq!(err.kind(), ErrorKind::ValueValidation, "{args:?}");
            assert!(err.use_stderr(), "{args:?}");
        }
    }

    #[test]
    fn min_above_max_is_a_usage_error() {
        let args = ["--min-name-len", "10", "--max-name-len", "5"];
        assert!(parse(&args).is_err());

        let args = CliArgs::try_parse_from(core::iter::once("xatoms").chain(args)).unwrap();
        let err = RunConfig::from_args(args).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArgumentConflict);
        assert!(err.use_stderr());
        assert!(err.to_string().contains("--min-name-len (10)"), "{err}");
    }

    #[test]
    fn help_and_version_are_not_failures() {
        for (flag, kind) in [
            ("-h", ErrorKind::DisplayHelp),
            ("--help", ErrorKind::DisplayHelp),
            ("-v", ErrorKind::DisplayVersion),
            ("--version", ErrorKind::DisplayVersion),
        ] {
            let err = parse_err(&[flag]);
            assert_eq!(err.kind(), kind, "{flag}");
            assert!(!err.use_stderr(), "{flag}");
        }
    }

    #[test]
    fn unknown_flag_and_trailing_args_fail() {
        let err = parse_err(&["--bogus"]);
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
        assert!(err.use_stderr());

        let err = parse_err(&["-n", "WM_NAME", "extra"]);
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
        assert!(err.use_stderr());
    }
}
