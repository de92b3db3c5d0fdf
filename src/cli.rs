use clap::Parser;
use std::path::PathBuf;

/// Generate a translated, profanity-filtered subtitle file for a video.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Source video file
    pub input: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn single_positional_argument_is_accepted() {
        let args = Args::try_parse_from(["lingosub", "movie.mp4"]).unwrap();
        assert_eq!(args.input, PathBuf::from("movie.mp4"));
        assert!(!args.verbose);
    }

    #[test]
    fn missing_input_is_a_usage_error() {
        let err = Args::try_parse_from(["lingosub"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn extra_positional_arguments_are_rejected() {
        let err = Args::try_parse_from(["lingosub", "a.mp4", "b.mp4"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
    }
}
