use deezer_overlay_core::TrackSnapshot;

/// Expands literal `\n` sequences, then substitutes every placeholder.
pub fn render(template: &str, snapshot: &TrackSnapshot) -> String {
    let replacements = [
        ("%ALBUM_ID%", snapshot.album_id.as_str()),
        ("%ALBUM_PICTURE%", snapshot.album_artwork_ref.as_str()),
        ("%ALBUM_TITLE%", snapshot.album_title.as_str()),
        ("%ARTIST_ID%", snapshot.artist_id.as_str()),
        ("%ARTIST_NAME%", snapshot.artist_name.as_str()),
        ("%SONG_ID%", snapshot.song_id.as_str()),
        ("%SONG_TITLE%", snapshot.song_title.as_str()),
    ];

    replacements
        .iter()
        .fold(template.replace("\\n", "\n"), |text, (token, value)| {
            text.replace(token, value)
        })
}

#[cfg(test)]
mod tests {
    use super::render;
    use deezer_overlay_core::TrackSnapshot;

    fn snapshot() -> TrackSnapshot {
        TrackSnapshot {
            song_id: "1".to_string(),
            song_title: "Harder, Better".to_string(),
            artist_id: "2".to_string(),
            artist_name: "Daft Punk".to_string(),
            album_id: "3".to_string(),
            album_title: "Discovery".to_string(),
            album_artwork_ref: "pic".to_string(),
            album_artwork: None,
        }
    }

    #[test]
    fn default_template_renders_two_lines() {
        assert_eq!(
            render("%SONG_TITLE%\\n\\n%ARTIST_NAME%", &snapshot()),
            "Harder, Better\n\nDaft Punk"
        );
    }

    #[test]
    fn substitutes_every_placeholder_repeatedly() {
        let out = render(
            "%ALBUM_ID%|%ALBUM_PICTURE%|%ALBUM_TITLE%|%ARTIST_ID%|%ARTIST_NAME%|%SONG_ID%|%SONG_TITLE%|%SONG_ID%",
            &snapshot(),
        );
        assert_eq!(out, "3|pic|Discovery|2|Daft Punk|1|Harder, Better|1");
    }

    #[test]
    fn leaves_unknown_tokens_alone() {
        assert_eq!(render("%GENRE% %SONG_ID%", &snapshot()), "%GENRE% 1");
    }
}
