/// Strip a single leading `v` from a release version (`v1.2.3` -> `1.2.3`).
pub fn normalize_version(version: &str) -> &str {
    version.strip_prefix('v').unwrap_or(version)
}
