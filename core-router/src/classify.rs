//! Request classification.
//!
//! Every intercepted request falls into exactly one [`RequestKind`]. Rules are
//! evaluated in order and the first match wins:
//!
//! 1. Audio: file extension in the audio set (case-insensitive), the path
//!    contains the audio marker, or the declared destination is audio
//! 2. Navigation: request mode is `navigate`
//! 3. Static: everything else

use bridge_traits::{FetchRequest, RequestDestination};
use core_runtime::config::CoreConfig;
use core_runtime::logging::strip_url_query;

/// Caching strategy bucket for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    /// Cache-first, never populated automatically.
    Audio,
    /// Network-first with app-shell fallback.
    Navigation,
    /// Stale-while-revalidate.
    Static,
}

#[derive(Debug, Clone)]
pub struct RequestClassifier {
    /// Lowercase, without the leading dot.
    audio_extensions: Vec<String>,
    audio_path_marker: String,
}

impl RequestClassifier {
    pub fn new<I, S>(audio_extensions: I, audio_path_marker: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            audio_extensions: audio_extensions
                .into_iter()
                .map(|ext| ext.as_ref().trim_start_matches('.').to_ascii_lowercase())
                .collect(),
            audio_path_marker: audio_path_marker.into(),
        }
    }

    pub fn from_config(config: &CoreConfig) -> Self {
        Self::new(&config.audio_extensions, config.audio_path_marker.clone())
    }

    pub fn classify(&self, request: &FetchRequest) -> RequestKind {
        if self.is_audio(request) {
            RequestKind::Audio
        } else if request.is_navigation() {
            RequestKind::Navigation
        } else {
            RequestKind::Static
        }
    }

    fn is_audio(&self, request: &FetchRequest) -> bool {
        if request.destination == RequestDestination::Audio {
            return true;
        }

        let path = url_path(&request.url);
        if !self.audio_path_marker.is_empty() && path.contains(&self.audio_path_marker) {
            return true;
        }

        extension(path)
            .map(|ext| {
                self.audio_extensions
                    .iter()
                    .any(|known| known.eq_ignore_ascii_case(ext))
            })
            .unwrap_or(false)
    }
}

/// Path component of an absolute or root-relative URL, without query or fragment.
fn url_path(url: &str) -> &str {
    let url = strip_url_query(url);
    match url.find("://") {
        Some(scheme_end) => {
            let rest = &url[scheme_end + 3..];
            rest.find('/').map(|slash| &rest[slash..]).unwrap_or("/")
        }
        None => url,
    }
}

fn extension(path: &str) -> Option<&str> {
    let file = path.rsplit('/').next()?;
    let (stem, ext) = file.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        None
    } else {
        Some(ext)
    }
}
