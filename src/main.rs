/// Headless preview driver for native builds.
///
/// Usage: `ocv-preview [--set name=value]... [--write-config] <file>...`
///
/// Files are selected one after another, exactly as a user picking them in
/// quick succession would; decodes complete afterwards, so only the last
/// selection ends up on the surface. `--write-config` stores the `--set`
/// values as the new defaults in the config file.
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use ocv_preview::headless::HeadlessSurface;
    use ocv_preview::state::LocalDecodeQueue;
    use ocv_preview::{Message, ParameterId, PreviewConfig, PreviewSession, SelectedFile};

    let mut config = PreviewConfig::load_from_default_path().unwrap_or_default();

    env_logger::Builder::new()
        .filter_level(config.log_level.to_level_filter())
        .parse_default_env()
        .init();

    let options = match Options::parse(std::env::args().skip(1)) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(2);
        }
    };

    if options.write_config {
        config.set_defaults(&options.settings);
        if let Err(e) = config.save_to_default_path() {
            eprintln!("Could not write config: {}", e);
            std::process::exit(1);
        }
    }

    let mut session = PreviewSession::from_config(
        &config,
        ocv_preview::constants::DEFAULT_PLACEHOLDER_TEXT,
        HeadlessSurface::new(),
    );
    let mut queue = LocalDecodeQueue::new();

    session.update(Message::Refresh);

    for path in &options.files {
        let file = match SelectedFile::from_path(path) {
            Ok(file) => file,
            Err(e) => {
                log::error!("Cannot read {:?}: {}", path, e);
                continue;
            }
        };
        session.select_queued(file, &mut queue, || std::fs::read(path));
    }

    for (id, value) in &options.settings {
        session.update(Message::ParameterChanged(*id, *value));
    }

    while session.pump_decode(&mut queue) {}

    let surface = session.surface();
    let presentation = surface.presentation();
    println!(
        "filter: {}",
        surface.filter_css().unwrap_or_else(|| "none".to_string())
    );
    for id in ParameterId::ALL {
        println!("{}: {}", id, surface.readout(id).unwrap_or("-"));
    }
    if let Some(asset) = session.intake().current() {
        match asset.dimensions {
            Some((w, h)) => println!("showing: {} ({}x{})", asset.name, w, h),
            None => println!("showing: {}", asset.name),
        }
    }
    println!(
        "placeholder: {} \"{}\"",
        if presentation.placeholder_visible { "visible" } else { "hidden" },
        presentation.placeholder_text
    );
    println!(
        "preview: {}",
        if presentation.preview_visible { "visible" } else { "hidden" }
    );
    for (field, value) in session.parameters().submission_fields() {
        println!("submit {}={}", field, value);
    }
}

/// Parsed command line.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Default, PartialEq)]
struct Options {
    settings: Vec<(ocv_preview::ParameterId, f64)>,
    files: Vec<std::path::PathBuf>,
    write_config: bool,
}

#[cfg(not(target_arch = "wasm32"))]
impl Options {
    fn parse(args: impl IntoIterator<Item = String>) -> Result<Self, String> {
        let mut options = Self::default();
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--set" => {
                    let assignment = args
                        .next()
                        .ok_or_else(|| "--set needs a name=value argument".to_string())?;
                    options.settings.push(parse_assignment(&assignment)?);
                }
                "--write-config" => options.write_config = true,
                _ => options.files.push(std::path::PathBuf::from(arg)),
            }
        }
        Ok(options)
    }
}

/// Parse `name=value`, accepting short names and control ids.
#[cfg(not(target_arch = "wasm32"))]
fn parse_assignment(text: &str) -> Result<(ocv_preview::ParameterId, f64), String> {
    let (name, value) = text
        .split_once('=')
        .ok_or_else(|| format!("Expected name=value, got '{}'", text))?;
    let id = name.trim().parse().map_err(|e| format!("{}", e))?;
    let value = value
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("Invalid value for {}: {}", name, e))?;
    Ok((id, value))
}

// WASM doesn't use main(), it uses wasm_bindgen's start function
#[cfg(target_arch = "wasm32")]
fn main() {}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;
    use ocv_preview::ParameterId;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_settings_files_and_write_config() {
        let options = Options::parse(args(&[
            "--set",
            "brightness=-10",
            "--set",
            "denoise_h=4",
            "--write-config",
            "a.png",
        ]))
        .unwrap();

        assert_eq!(
            options.settings,
            vec![(ParameterId::Brightness, -10.0), (ParameterId::Denoise, 4.0)]
        );
        assert_eq!(options.files, vec![std::path::PathBuf::from("a.png")]);
        assert!(options.write_config);
    }

    #[test]
    fn test_parse_errors() {
        assert!(Options::parse(args(&["--set"])).is_err());
        assert!(Options::parse(args(&["--set", "gamma=2"])).is_err());
        assert!(Options::parse(args(&["--set", "contrast"])).is_err());
        assert!(Options::parse(args(&["--set", "contrast=high"])).is_err());
    }
}
