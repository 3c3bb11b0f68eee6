//! Actionable outputs: magnet links and `.torrent` files.

mod fetcher;
mod magnet;

pub use fetcher::{FetchError, FetchedTorrent, TorrentFetcher};
pub use magnet::{build_magnet, sanitize_filename, torrent_file_name, TRACKERS};
