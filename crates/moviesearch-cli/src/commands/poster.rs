use super::search_ui::SearchUI;
use crate::output::Output;
use color_eyre::Result;
use movie_search_network::tmdb::closest_poster_width;
use movie_search_network::CancellationToken;
use serde_json::json;
use std::path::Path;

pub async fn run_poster(path: &str, width: u32, out: &Path, output: &Output) -> Result<()> {
    let path = normalize_poster_path(path)
        .ok_or_else(|| color_eyre::eyre::eyre!("Poster path must not be empty"))?;

    let container = super::load_scene()?;
    let repository = container.make_poster_images_repository();

    let cancel = CancellationToken::new();
    let interrupt = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        })
    };

    let ui = SearchUI::new(output);
    let spinner = ui.start(format!("Downloading poster {}", path));
    let result = repository.fetch_image(&path, width, &cancel).await;
    interrupt.abort();
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    let data = match result {
        Ok(data) => data,
        Err(e) if e.is_cancelled() => {
            output.warn("Download cancelled");
            return Ok(());
        }
        Err(e) => return Err(color_eyre::eyre::eyre!("Failed to download poster {}: {}", path, e)),
    };

    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| color_eyre::eyre::eyre!("Failed to create {}: {}", parent.display(), e))?;
    }
    tokio::fs::write(out, &data)
        .await
        .map_err(|e| color_eyre::eyre::eyre!("Failed to write {}: {}", out.display(), e))?;

    if output.is_human() {
        output.success(format!(
            "Saved poster {} (w{}, {} bytes) to {}",
            path,
            closest_poster_width(width),
            data.len(),
            out.display()
        ));
    } else {
        output.json(&json!({
            "type": "poster",
            "path": path,
            "width": closest_poster_width(width),
            "bytes": data.len(),
            "file": out.display().to_string(),
        }));
    }

    Ok(())
}

/// Poster paths are appended to the size segment and must start with '/'
fn normalize_poster_path(path: &str) -> Option<String> {
    let path = path.trim();
    if path.is_empty() || path == "/" {
        return None;
    }
    if path.starts_with('/') {
        Some(path.to_string())
    } else {
        Some(format!("/{}", path))
    }
}
