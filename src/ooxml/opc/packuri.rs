/// Part names within an OPC package.
///
/// A `PackURI` always begins with a forward slash and uses forward slashes as
/// separators (`/ppt/slides/slide3.xml`). ZIP member names are the same string
/// without the leading slash.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PackURI {
    uri: String,
}

impl PackURI {
    /// Create a new PackURI, rejecting strings without a leading slash.
    pub fn new<S: Into<String>>(uri: S) -> Result<Self, String> {
        let uri = uri.into();
        if !uri.starts_with('/') {
            return Err(format!("PackURI must begin with slash, got '{}'", uri));
        }
        Ok(PackURI { uri })
    }

    /// Create a PackURI from a ZIP member name (`ppt/slides/slide1.xml`).
    pub fn from_membername(membername: &str) -> Self {
        PackURI {
            uri: format!("/{}", membername.trim_start_matches('/')),
        }
    }

    /// Resolve a relationship target (like `../slideLayouts/slideLayout2.xml`)
    /// against the directory of its source part (like `/ppt/slides`).
    pub fn from_rel_ref(base_uri: &str, relative_ref: &str) -> Result<Self, String> {
        // Absolute targets are legal in .rels files and ignore the base.
        let joined = if relative_ref.starts_with('/') {
            relative_ref.to_string()
        } else if base_uri.ends_with('/') {
            format!("{}{}", base_uri, relative_ref)
        } else {
            format!("{}/{}", base_uri, relative_ref)
        };

        let mut segments: Vec<&str> = Vec::new();
        for segment in joined.split('/') {
            match segment {
                "" | "." => {},
                ".." => {
                    segments.pop();
                },
                other => segments.push(other),
            }
        }

        Self::new(format!("/{}", segments.join("/")))
    }

    /// Directory portion, e.g. `/ppt/slides` for `/ppt/slides/slide1.xml`.
    pub fn base_uri(&self) -> &str {
        match self.uri.rfind('/') {
            Some(0) | None => "/",
            Some(pos) => &self.uri[..pos],
        }
    }

    /// Filename portion, e.g. `slide1.xml`. Empty for the package URI.
    pub fn filename(&self) -> &str {
        self.uri.rsplit('/').next().unwrap_or("")
    }

    /// Extension without the leading period, e.g. `xml`.
    pub fn ext(&self) -> &str {
        self.filename()
            .rsplit_once('.')
            .map(|(_, ext)| ext)
            .unwrap_or("")
    }

    /// ZIP member name (URI without its leading slash).
    pub fn membername(&self) -> &str {
        &self.uri[1..]
    }

    /// Relative reference from `base_uri` to this part, the form stored in
    /// relationship targets (`../media/image1.png` from `/ppt/slides`).
    pub fn relative_ref(&self, base_uri: &str) -> String {
        if base_uri == "/" {
            return self.membername().to_string();
        }

        let from: Vec<&str> = base_uri.split('/').filter(|s| !s.is_empty()).collect();
        let to: Vec<&str> = self.uri.split('/').filter(|s| !s.is_empty()).collect();
        let common = from
            .iter()
            .zip(to.iter())
            .take_while(|(a, b)| a == b)
            .count();

        let mut parts: Vec<&str> = vec![".."; from.len() - common];
        parts.extend_from_slice(&to[common..]);
        parts.join("/")
    }

    /// PackURI of the `.rels` part holding this part's relationships.
    pub fn rels_uri(&self) -> Result<PackURI, String> {
        let base_uri = self.base_uri();
        if base_uri == "/" {
            Self::new(format!("/_rels/{}.rels", self.filename()))
        } else {
            Self::new(format!("{}/_rels/{}.rels", base_uri, self.filename()))
        }
    }

    /// Source PackURI for a `.rels` member name, or None if the member is not
    /// a relationships part. `_rels/.rels` maps to the package URI `/`.
    pub fn source_of_rels(membername: &str) -> Option<PackURI> {
        let stripped = membername.strip_suffix(".rels")?;
        let (dir, filename) = match stripped.rsplit_once("_rels/") {
            Some((dir, filename)) => (dir, filename),
            None => return None,
        };
        Some(PackURI::from_membername(&format!("{}{}", dir, filename)))
    }

    /// Full URI string.
    pub fn as_str(&self) -> &str {
        &self.uri
    }
}

impl std::fmt::Display for PackURI {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.uri)
    }
}

impl AsRef<str> for PackURI {
    fn as_ref(&self) -> &str {
        &self.uri
    }
}

/// The package pseudo-partname, representing the package itself
pub const PACKAGE_URI: &str = "/";

/// The URI for the [Content_Types].xml part
pub const CONTENT_TYPES_URI: &str = "/[Content_Types].xml";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packuri_new() {
        assert!(PackURI::new("/ppt/presentation.xml").is_ok());
        assert!(PackURI::new("ppt/presentation.xml").is_err());
    }

    #[test]
    fn test_components() {
        let uri = PackURI::new("/ppt/slides/slide12.xml").unwrap();
        assert_eq!(uri.base_uri(), "/ppt/slides");
        assert_eq!(uri.filename(), "slide12.xml");
        assert_eq!(uri.ext(), "xml");
        assert_eq!(uri.membername(), "ppt/slides/slide12.xml");

        let pres = PackURI::new("/ppt/presentation.xml").unwrap();
        assert_eq!(pres.base_uri(), "/ppt");
        assert_eq!(PackURI::new("/").unwrap().base_uri(), "/");
    }

    #[test]
    fn test_from_rel_ref() {
        let uri = PackURI::from_rel_ref("/ppt/slides", "../slideLayouts/slideLayout7.xml").unwrap();
        assert_eq!(uri.as_str(), "/ppt/slideLayouts/slideLayout7.xml");

        let uri = PackURI::from_rel_ref("/", "ppt/presentation.xml").unwrap();
        assert_eq!(uri.as_str(), "/ppt/presentation.xml");

        let uri = PackURI::from_rel_ref("/ppt", "/ppt/slides/slide1.xml").unwrap();
        assert_eq!(uri.as_str(), "/ppt/slides/slide1.xml");
    }

    #[test]
    fn test_relative_ref() {
        let image = PackURI::new("/ppt/media/image3.png").unwrap();
        assert_eq!(image.relative_ref("/ppt/slides"), "../media/image3.png");

        let slide = PackURI::new("/ppt/slides/slide2.xml").unwrap();
        assert_eq!(slide.relative_ref("/ppt"), "slides/slide2.xml");
        assert_eq!(slide.relative_ref("/"), "ppt/slides/slide2.xml");
    }

    #[test]
    fn test_rels_uri_round_trip() {
        let slide = PackURI::new("/ppt/slides/slide2.xml").unwrap();
        let rels = slide.rels_uri().unwrap();
        assert_eq!(rels.as_str(), "/ppt/slides/_rels/slide2.xml.rels");
        assert_eq!(PackURI::source_of_rels(rels.membername()), Some(slide));

        assert_eq!(
            PackURI::source_of_rels("_rels/.rels").unwrap().as_str(),
            PACKAGE_URI
        );
        assert_eq!(PackURI::source_of_rels("ppt/slides/slide2.xml"), None);
    }
}
