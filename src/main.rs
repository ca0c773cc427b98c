use clap::Parser;
use og_preview::core::feedback::FeedbackTiming;
use og_preview::core::{ConfigProvider, PostField, ToastKind};
use og_preview::utils::{logger, validation::Validate};
use og_preview::{
    CliConfig, GenerationOutcome, HttpImageGenerator, LocalStorage, OgError, Session, TomlConfig,
};

#[cfg(feature = "clipboard")]
type AppClipboard = og_preview::adapters::SystemClipboard;
#[cfg(not(feature = "clipboard"))]
type AppClipboard = og_preview::adapters::UnsupportedClipboard;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting og-preview");
    tracing::debug!("CLI config: {:?}", cli);

    let settings = match load_settings(&cli) {
        Ok(settings) => settings,
        Err(e) => exit_with(&e, 1),
    };

    let storage = LocalStorage::new(settings.output_dir());
    let generator = match HttpImageGenerator::from_config(&*settings, storage) {
        Ok(generator) => generator,
        Err(e) => exit_with(&e, 1),
    };
    tracing::debug!("Using image service at {}", generator.endpoint());

    let session = Session::with_timing(
        generator,
        AppClipboard::default(),
        FeedbackTiming::from_config(&*settings),
    );

    // 套用表單輸入
    session.update_field(PostField::Title, cli.title.clone());
    session.update_field(PostField::Content, cli.content.clone());
    session.set_variant(cli.variant);
    if let Some(path) = &cli.image_file {
        match tokio::fs::read(path).await {
            Ok(bytes) => {
                tracing::info!("📎 Uploading {} ({} bytes)", path.display(), bytes.len());
                session.set_uploaded_image(bytes);
            }
            Err(e) => exit_with(&OgError::Io(e), 1),
        }
    } else if let Some(url) = &cli.image_url {
        session.set_remote_image_url(url.clone());
    }

    let outcome = match session.generate().await {
        Ok(outcome) => outcome,
        Err(e) => exit_with(&e, 1),
    };

    if let GenerationOutcome::Succeeded(_) = &outcome {
        if cli.copy {
            if let Err(e) = session.copy_metadata().await {
                tracing::warn!("Could not copy metadata: {}", e);
            }
        }
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&session.snapshot())?);
    } else {
        print_report(&session, &outcome, cli.copy);
    }

    if let GenerationOutcome::Failed(e) = outcome {
        tracing::error!(
            "❌ Generation failed: {} (retryable: {})",
            e,
            e.is_retryable()
        );
        eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
        std::process::exit(2);
    }

    Ok(())
}

fn load_settings(cli: &CliConfig) -> og_preview::Result<Box<dyn ConfigProvider>> {
    cli.validate_copy()?;
    match &cli.config {
        Some(path) => {
            tracing::info!("Loading settings from {}", path.display());
            let config = TomlConfig::from_file(path)?;
            config.validate()?;
            Ok(Box::new(config))
        }
        None => {
            cli.validate()?;
            Ok(Box::new(cli.clone()))
        }
    }
}

fn print_report<G, C>(session: &Session<G, C>, outcome: &GenerationOutcome, copy_requested: bool)
where
    G: og_preview::core::ImageGenerator,
    C: og_preview::core::Clipboard,
{
    if outcome.is_success() {
        println!("✅ {}", outcome.message());
    } else {
        eprintln!("❌ {}", outcome.message());
    }

    // the latest toast is the copy feedback
    if copy_requested && outcome.is_success() {
        if let Some(toast) = session.toast() {
            match toast.kind {
                ToastKind::Success => println!("📋 {}", toast.message),
                ToastKind::Error => eprintln!("❌ {}", toast.message),
            }
        }
    }

    if let Some(result) = session.result() {
        println!("🖼️  {}", result.image_url);
        println!();
        println!("{}", result.metadata);
    }
}

fn exit_with(e: &OgError, code: i32) -> ! {
    tracing::error!("❌ {}", e);
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
    std::process::exit(code)
}
