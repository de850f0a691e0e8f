use crate::{Error, Result};
use deezer_overlay_core::TrackSnapshot;
use serde::Deserialize;
use serde_json::Value;

const HOME_PATH: [&str; 2] = ["TAB", "home"];
const ONLINE_KEY: &str = "online";

/// What the profile's home tab says about the current listening session.
#[derive(Debug, Clone, PartialEq)]
pub enum Presence {
    Online(TrackSnapshot),
    Offline,
}

/// Parses the application state and narrows it to the `TAB.home.online` node.
///
/// Only that node is deserialized into a fixed shape; the rest of the
/// document stays an untyped tree so unrelated changes upstream are ignored.
pub fn presence(app_state: &str) -> Result<Presence> {
    let root: Value = serde_json::from_str(app_state)
        .map_err(|e| Error::Schema(format!("application state is not JSON: {e}")))?;

    let home = HOME_PATH.iter().try_fold(&root, |node, key| {
        descend(node, key).ok_or_else(|| Error::Schema(format!("missing object `{key}`")))
    })?;

    match home.get(ONLINE_KEY) {
        Some(online) => snapshot_from(online).map(Presence::Online),
        None => Ok(Presence::Offline),
    }
}

fn descend<'a>(node: &'a Value, key: &str) -> Option<&'a Value> {
    node.as_object()
        .and_then(|obj| obj.get(key))
        .filter(|child| child.is_object())
}

fn snapshot_from(online: &Value) -> Result<TrackSnapshot> {
    if !online.is_object() {
        return Err(Error::Schema("`online` is not an object".to_string()));
    }
    TrackSnapshot::deserialize(online)
        .map_err(|e| Error::Schema(format!("unreadable `online` payload: {e}")))
}

#[cfg(test)]
mod tests {
    use super::{presence, Presence};
    use crate::Error;
    use deezer_overlay_core::TrackSnapshot;

    #[test]
    fn online_node_maps_onto_snapshot() {
        let json = r#"{"TAB":{"home":{"online":{"SNG_ID":"1","SNG_TITLE":"T","ART_ID":"2","ART_NAME":"A","ALB_ID":"3","ALB_TITLE":"AL","ALB_PICTURE":"pic123"}}}}"#;

        let Presence::Online(snapshot) = presence(json).unwrap() else {
            panic!("expected online");
        };
        assert_eq!(snapshot.song_id, "1");
        assert_eq!(snapshot.song_title, "T");
        assert_eq!(snapshot.artist_id, "2");
        assert_eq!(snapshot.artist_name, "A");
        assert_eq!(snapshot.album_id, "3");
        assert_eq!(snapshot.album_title, "AL");
        assert_eq!(snapshot.album_artwork_ref, "pic123");
        assert!(snapshot.album_artwork.is_none());
    }

    #[test]
    fn absent_online_key_means_offline() {
        assert_eq!(presence(r#"{"TAB":{"home":{}}}"#).unwrap(), Presence::Offline);
    }

    #[test]
    fn unknown_keys_ignored_and_missing_keys_empty() {
        let json = r#"{"USER":{"x":1},"TAB":{"home":{"online":{"SNG_ID":"9","DURATION":"200"}}}}"#;

        let expected = TrackSnapshot {
            song_id: "9".to_string(),
            ..Default::default()
        };
        assert_eq!(presence(json).unwrap(), Presence::Online(expected));
    }

    #[test]
    fn missing_or_non_object_path_is_schema_error() {
        for json in [
            r#"{}"#,
            r#"{"TAB":[]}"#,
            r#"{"TAB":{"home":"nope"}}"#,
            r#"[1,2]"#,
            r#"{"TAB":{"home":"#,
        ] {
            assert!(
                matches!(presence(json), Err(Error::Schema(_))),
                "{json} should be a schema error"
            );
        }
    }

    #[test]
    fn mistyped_online_payload_is_schema_error() {
        for json in [
            r#"{"TAB":{"home":{"online":{"SNG_ID":12}}}}"#,
            r#"{"TAB":{"home":{"online":true}}}"#,
        ] {
            assert!(matches!(presence(json), Err(Error::Schema(_))));
        }
    }
}
