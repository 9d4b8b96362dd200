use semver::{BuildMetadata, Version};

/// Normalize a version string the way it is keyed in the cache.
///
/// Surrounding whitespace and leading `=`/`v` are stripped and the result must
/// parse as a full semantic version; build metadata is dropped. Anything that
/// does not parse is returned trimmed but otherwise verbatim.
pub fn clean_version(raw: &str) -> String {
    let candidate = raw.trim().trim_start_matches(['=', 'v']);
    match Version::parse(candidate) {
        Ok(mut version) => {
            version.build = BuildMetadata::EMPTY;
            version.to_string()
        }
        Err(_) => raw.trim().to_string(),
    }
}
