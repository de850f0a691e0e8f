use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use url::{ParseError, Url};

const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

const COVER_SUFFIX: &str = "400x400-000000-80-0-0.jpg";

fn as_directory(base: &Url) -> Url {
    let mut dir = base.clone();
    if !dir.path().ends_with('/') {
        let path = format!("{}/", dir.path());
        dir.set_path(&path);
    }
    dir
}

pub fn profile_url(base: &Url, profile_id: u64) -> Result<Url, ParseError> {
    as_directory(base).join(&format!("profile/{profile_id}"))
}

pub fn artwork_url(base: &Url, artwork_ref: &str) -> Result<Url, ParseError> {
    let encoded = utf8_percent_encode(artwork_ref, PATH_SEGMENT);
    as_directory(base).join(&format!("images/cover/{encoded}/{COVER_SUFFIX}"))
}

#[cfg(test)]
mod tests {
    use super::{artwork_url, profile_url};
    use url::Url;

    #[test]
    fn builds_profile_and_cover_urls() {
        let site = Url::parse("http://www.deezer.com").unwrap();
        let cdn = Url::parse("http://cdn-images.deezer.com/").unwrap();

        assert_eq!(
            profile_url(&site, 875499801).unwrap().as_str(),
            "http://www.deezer.com/profile/875499801"
        );
        assert_eq!(
            artwork_url(&cdn, "2e018122cb56986277102d2041a592c8").unwrap().as_str(),
            "http://cdn-images.deezer.com/images/cover/2e018122cb56986277102d2041a592c8/400x400-000000-80-0-0.jpg"
        );
    }

    #[test]
    fn keeps_base_path_prefix() {
        let base = Url::parse("http://127.0.0.1:8080/mirror").unwrap();
        assert_eq!(
            profile_url(&base, 1).unwrap().as_str(),
            "http://127.0.0.1:8080/mirror/profile/1"
        );
    }

    #[test]
    fn artwork_ref_cannot_escape_its_segment() {
        let cdn = Url::parse("http://cdn.example").unwrap();
        let url = artwork_url(&cdn, "../a b?").unwrap();
        assert_eq!(
            url.as_str(),
            "http://cdn.example/images/cover/..%2Fa%20b%3F/400x400-000000-80-0-0.jpg"
        );
    }
}
