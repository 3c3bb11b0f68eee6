//! Magnet links and torrent file names.

/// Public trackers appended to every magnet link.
pub const TRACKERS: &[&str] = &[
    "udp://open.demonii.com:1337/announce",
    "udp://tracker.openbittorrent.com:80/announce",
    "udp://tracker.coppersurfer.tk:6969/announce",
    "udp://glotorrents.pw:6969/announce",
    "udp://tracker.opentrackr.org:1337/announce",
];

/// Build a magnet URI for an info hash, display name and the public trackers.
pub fn build_magnet(hash: &str, name: &str) -> String {
    let mut magnet = format!(
        "magnet:?xt=urn:btih:{}&dn={}",
        hash.trim(),
        urlencoding::encode(name)
    );
    for tracker in TRACKERS {
        magnet.push_str("&tr=");
        magnet.push_str(&urlencoding::encode(tracker));
    }
    magnet
}

/// Replace characters that are not allowed in file names with `-`.
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '-',
            c => c,
        })
        .collect()
}

/// File name for a downloaded torrent: `{title}.{quality}.torrent`.
pub fn torrent_file_name(title: &str, quality: &str) -> String {
    format!(
        "{}.{}.torrent",
        sanitize_filename(title),
        sanitize_filename(quality)
    )
}
