use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, info};

use crate::context::Context;
use crate::errors::{Error, Result};
use crate::template::Template;

/// The build pipeline around the rendering core: one rendered page per
/// locale, plus verbatim copies of the redirect page and static assets.
///
/// Expected source layout:
///
/// ```text
/// src/
///   data/<locale>.json      per-locale data tree (the render context)
///   <locale>/index.html     per-locale page template
///   index.html              optional language-redirect page, copied verbatim
///   public/                 optional static assets, copied verbatim
/// ```
#[derive(Clone, Debug)]
pub struct Site {
    src_dir: PathBuf,
    out_dir: PathBuf,
}

impl Site {
    /// A site that reads from `src_dir` and writes into `out_dir`.
    pub fn new(src_dir: impl Into<PathBuf>, out_dir: impl Into<PathBuf>) -> Site {
        Site {
            src_dir: src_dir.into(),
            out_dir: out_dir.into(),
        }
    }

    /// Renders every locale page and copies static files into the output
    /// directory.
    pub fn build(&self) -> Result<()> {
        let locales = self.discover_locales()?;
        if locales.is_empty() {
            return Err(Error::msg(format!(
                "no locale data files found under {}",
                self.src_dir.join("data").display()
            )));
        }

        fs::create_dir_all(&self.out_dir)?;
        for locale in &locales {
            self.build_page(locale)?;
        }
        self.copy_root_index()?;
        self.copy_assets()?;

        info!(
            "built {} locale page(s) into {}",
            locales.len(),
            self.out_dir.display()
        );
        Ok(())
    }

    /// Every `<src>/data/<locale>.json` file defines a locale.
    fn discover_locales(&self) -> Result<Vec<String>> {
        let data_dir = self.src_dir.join("data");
        let entries = fs::read_dir(&data_dir).map_err(|e| {
            Error::chain(format!("couldn't read data directory {}", data_dir.display()), e)
        })?;

        let mut locales = Vec::new();
        for entry in entries {
            let path = entry.map_err(Error::io_error)?.path();
            if path.extension().map_or(false, |ext| ext == "json") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    locales.push(stem.to_owned());
                }
            }
        }
        // deterministic build order
        locales.sort();
        Ok(locales)
    }

    fn build_page(&self, locale: &str) -> Result<()> {
        let template_path = self.src_dir.join(locale).join("index.html");
        let input = read_file(&template_path)?;

        let data_path = self.src_dir.join("data").join(format!("{}.json", locale));
        let data: Value = serde_json::from_str(&read_file(&data_path)?).map_err(|e| {
            Error::chain(format!("invalid JSON in {}", data_path.display()), e)
        })?;
        let context = Context::from_value(data)?;

        let html = Template::new(locale, &input).render(&context);

        let out_dir = self.out_dir.join(locale);
        fs::create_dir_all(&out_dir)?;
        let out_path = out_dir.join("index.html");
        fs::write(&out_path, html).map_err(|e| {
            Error::chain(format!("couldn't write {}", out_path.display()), e)
        })?;

        info!("wrote {}", out_path.display());
        Ok(())
    }

    /// The top-level `index.html` is a static language-redirect page; it is
    /// copied, not rendered.
    fn copy_root_index(&self) -> Result<()> {
        let index = self.src_dir.join("index.html");
        if !index.is_file() {
            return Ok(());
        }
        let dest = self.out_dir.join("index.html");
        fs::copy(&index, &dest).map_err(|e| {
            Error::chain(format!("couldn't copy {}", index.display()), e)
        })?;
        info!("wrote {}", dest.display());
        Ok(())
    }

    fn copy_assets(&self) -> Result<()> {
        let public = self.src_dir.join("public");
        if !public.is_dir() {
            return Ok(());
        }

        let walker = globwalk::GlobWalkerBuilder::from_patterns(&public, &["**/*"])
            .follow_links(true)
            .build()
            .map_err(|e| Error::chain("couldn't walk the public asset directory", e))?;

        for entry in walker.into_iter().filter_map(|e| e.ok()) {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let relative = path.strip_prefix(&public).map_err(|e| {
                Error::chain(format!("asset {} outside the public directory", path.display()), e)
            })?;
            let dest = self.out_dir.join(relative);
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(path, &dest).map_err(|e| {
                Error::chain(format!("couldn't copy asset {}", path.display()), e)
            })?;
            debug!("copied {}", relative.display());
        }
        Ok(())
    }
}

fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .map_err(|e| Error::chain(format!("couldn't read {}", path.display()), e))
}
