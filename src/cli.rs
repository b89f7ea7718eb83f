use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[arg(long, value_name = "port", env = "PORT", default_value = "8080")]
    pub port: u16,
    /// Endpoint of the upstream markdown render service.
    #[arg(long, value_name = "upstream_url", env = "EDITOR_UPSTREAM_RENDER_URL")]
    pub upstream_url: Option<String>,
    /// Call the upstream without an identity token (local development).
    /// Any non-empty value enables it, including "0" and "false".
    #[arg(
        long,
        value_name = "any",
        env = "EDITOR_UPSTREAM_UNAUTHENTICATED",
        num_args = 0..=1,
        default_missing_value = "1"
    )]
    pub unauthenticated: Option<String>,
    #[arg(long, value_name = "host", env = "GCE_METADATA_HOST", default_value = "metadata.google.internal")]
    pub metadata_host: String,
    #[arg(long, value_name = "seconds", env = "EDITOR_UPSTREAM_TIMEOUT_SECS", default_value = "30")]
    pub upstream_timeout_secs: u64,
    #[arg(long, value_name = "dir", env = "EDITOR_TEMPLATES_DIR", default_value = "templates")]
    pub templates_dir: PathBuf,
    #[arg(long, value_name = "bytes", env = "EDITOR_MAX_BODY_BYTES", default_value = "1048576")]
    pub max_body_bytes: usize,
}

impl Args {
    pub fn unauthenticated(&self) -> bool {
        self.unauthenticated.as_deref().is_some_and(|v| !v.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() {
        let args = Args::try_parse_from([
            "editor",
            "--upstream-url",
            "https://renderer.example.com",
            "--unauthenticated",
            "--port",
            "9000",
        ])
        .unwrap();

        assert_eq!(args.upstream_url.as_deref(), Some("https://renderer.example.com"));
        assert!(args.unauthenticated());
        assert_eq!(args.port, 9000);
    }

    #[test]
    fn any_unauthenticated_value_counts_as_set() {
        for value in ["0", "false", "1"] {
            let flag = format!("--unauthenticated={value}");
            let args = Args::try_parse_from(["editor", flag.as_str()]).unwrap();
            assert!(args.unauthenticated(), "value: {value}");
        }

        let args = Args::try_parse_from(["editor", "--unauthenticated="]).unwrap();
        assert!(!args.unauthenticated());
    }

    #[test]
    fn unauthenticated_env_value_zero_counts_as_set() {
        let cmd = <Args as clap::CommandFactory>::command();
        let arg = cmd
            .get_arguments()
            .find(|a| a.get_id() == "unauthenticated")
            .unwrap();
        assert_eq!(
            arg.get_env().and_then(|e| e.to_str()),
            Some("EDITOR_UPSTREAM_UNAUTHENTICATED")
        );

        // Env values go through the same parser as the flag value.
        let args = Args::try_parse_from(["editor", "--unauthenticated", "0"]).unwrap();
        assert!(args.unauthenticated());
    }

    #[test]
    fn upstream_url_is_optional_at_parse_time() {
        let args = Args::try_parse_from(["editor", "--upstream-url", ""]).unwrap();
        assert_eq!(args.upstream_url.as_deref(), Some(""));
    }
}
