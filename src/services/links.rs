/// Link construction for result cards
///
/// External links and thumbnails are resolved through explicit fallback
/// chains: an ordered list of item fields, tried in order, then a URL
/// derived from the video id. Empty strings count as absent.
use serde::Serialize;

use crate::models::{Quality, SearchResultItem};

type Field = fn(&SearchResultItem) -> Option<&str>;

/// Ordered field sources with a final id-derived default
pub struct FallbackChain {
    sources: &'static [Field],
    fallback: fn(&str) -> String,
}

impl FallbackChain {
    pub fn resolve(&self, item: &SearchResultItem) -> String {
        self.sources
            .iter()
            .find_map(|field| field(item).filter(|value| !value.trim().is_empty()))
            .map(str::to_string)
            .unwrap_or_else(|| (self.fallback)(&item.id))
    }
}

fn thumbnail_hq(item: &SearchResultItem) -> Option<&str> {
    item.thumbnail_hq.as_deref()
}

fn thumbnail(item: &SearchResultItem) -> Option<&str> {
    item.thumbnail.as_deref()
}

fn thumbnail_sd(item: &SearchResultItem) -> Option<&str> {
    item.thumbnail_sd.as_deref()
}

fn youtube_watch_url(item: &SearchResultItem) -> Option<&str> {
    item.youtube_watch_url.as_deref()
}

fn youtube_url(item: &SearchResultItem) -> Option<&str> {
    item.youtube_url.as_deref()
}

fn youtube_music_url(item: &SearchResultItem) -> Option<&str> {
    item.youtube_music_url.as_deref()
}

fn youtube_short_url(item: &SearchResultItem) -> Option<&str> {
    item.youtube_short_url.as_deref()
}

fn default_thumbnail(id: &str) -> String {
    format!("https://i.ytimg.com/vi/{}/hqdefault.jpg", id)
}

fn default_watch(id: &str) -> String {
    format!("https://www.youtube.com/watch?v={}", id)
}

fn default_music(id: &str) -> String {
    format!("https://music.youtube.com/watch?v={}", id)
}

fn default_short(id: &str) -> String {
    format!("https://youtu.be/{}", id)
}

pub const THUMBNAIL: FallbackChain = FallbackChain {
    sources: &[thumbnail_hq, thumbnail, thumbnail_sd],
    fallback: default_thumbnail,
};

pub const WATCH: FallbackChain = FallbackChain {
    sources: &[youtube_watch_url, youtube_url],
    fallback: default_watch,
};

pub const MUSIC: FallbackChain = FallbackChain {
    sources: &[youtube_music_url],
    fallback: default_music,
};

pub const SHORT: FallbackChain = FallbackChain {
    sources: &[youtube_short_url],
    fallback: default_short,
};

/// Every static URL a card needs, computed once at render time
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardLinks {
    pub thumbnail: String,
    pub watch: String,
    pub music: String,
    pub short: String,
}

impl CardLinks {
    pub fn resolve(item: &SearchResultItem) -> Self {
        Self {
            thumbnail: THUMBNAIL.resolve(item),
            watch: WATCH.resolve(item),
            music: MUSIC.resolve(item),
            short: SHORT.resolve(item),
        }
    }
}

/// Builds downloader URLs of the form `<base>/<quality>/id=<encoded id>`
#[derive(Debug, Clone)]
pub struct DownloadLinks {
    base: String,
}

impl DownloadLinks {
    pub fn new(base: &str) -> Self {
        Self {
            base: base.trim_end_matches('/').to_string(),
        }
    }

    pub fn url(&self, video_id: &str, quality: Quality) -> String {
        format!(
            "{}/{}/id={}",
            self.base,
            quality.as_str(),
            urlencoding::encode(video_id)
        )
    }
}
