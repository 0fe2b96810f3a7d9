mod backend_bridge;
mod controller;
mod ui;

use clap::Parser;
use crossbeam_channel::bounded;
use eframe::egui;

use backend_bridge::commands::BackendCommand;
use controller::events::UiEvent;
use ui::{PersistedShowcaseSettings, ShowcaseApp, StartupConfig, SETTINGS_STORAGE_KEY};

#[derive(Debug, Parser)]
#[command(name = "showcase_gui", about = "WohnenWo marketing and portal showcase")]
struct Args {
    /// Identity provider base URL.
    #[arg(long, default_value = "http://127.0.0.1:54321/auth/v1")]
    identity_url: String,
    /// Storage provider base URL.
    #[arg(long, default_value = "http://127.0.0.1:54321")]
    storage_url: String,
    /// Signed-URL gateway base URL.
    #[arg(long, default_value = "http://127.0.0.1:8788")]
    signer_url: String,
    /// Bucket holding the per-user document folders.
    #[arg(long, default_value = shared::protocol::DEFAULT_SIGN_BUCKET)]
    bucket: String,
    /// Anonymous API key for the identity and storage provider.
    #[arg(long, default_value = "dev-anon-key")]
    api_key: String,
}

impl Args {
    fn into_startup_config(self) -> StartupConfig {
        StartupConfig {
            identity_url: self.identity_url,
            storage_url: self.storage_url,
            signer_url: self.signer_url,
            bucket: self.bucket,
            api_key: self.api_key,
        }
    }
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let startup = Args::parse().into_startup_config();

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(256);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(2048);
    backend_bridge::runtime::launch(startup, cmd_rx, ui_tx);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("WohnenWo")
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([980.0, 640.0]),
        ..Default::default()
    };
    eframe::run_native(
        "WohnenWo",
        options,
        Box::new(|cc| {
            let persisted_settings = cc.storage.and_then(|storage| {
                storage
                    .get_string(SETTINGS_STORAGE_KEY)
                    .and_then(|text| serde_json::from_str::<PersistedShowcaseSettings>(&text).ok())
            });
            Ok(Box::new(ShowcaseApp::new(cmd_tx, ui_rx, persisted_settings)))
        }),
    )
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::Args;

    #[test]
    fn args_default_to_local_dev_endpoints() {
        let args = Args::parse_from(["showcase_gui"]);
        assert_eq!(args.identity_url, "http://127.0.0.1:54321/auth/v1");
        assert_eq!(args.storage_url, "http://127.0.0.1:54321");
        assert_eq!(args.signer_url, "http://127.0.0.1:8788");
        assert_eq!(args.bucket, "invoice-docs");
        assert_eq!(args.api_key, "dev-anon-key");
    }

    #[test]
    fn args_accept_custom_endpoints() {
        let args = Args::parse_from([
            "showcase_gui",
            "--identity-url",
            "https://id.wohnenwo.example/auth/v1",
            "--signer-url",
            "https://sign.wohnenwo.example",
            "--bucket",
            "lease-docs",
        ]);
        let startup = args.into_startup_config();
        assert_eq!(startup.identity_url, "https://id.wohnenwo.example/auth/v1");
        assert_eq!(startup.signer_url, "https://sign.wohnenwo.example");
        assert_eq!(startup.bucket, "lease-docs");
        assert_eq!(startup.storage_url, "http://127.0.0.1:54321");
    }
}
