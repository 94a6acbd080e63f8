use url::Url;

const LINKEDIN_ORIGIN: &str = "https://www.linkedin.com";

/// Personal profiles live under `/in/` on a linkedin.com host, company pages under `/company/`.
pub fn is_personal_profile_url(url: &str) -> bool {
    let url = url.trim();
    if url.starts_with("/in/") {
        return true;
    }

    resolve(url).is_some_and(|u| {
        let on_linkedin = u
            .host_str()
            .is_some_and(|h| h == "linkedin.com" || h.ends_with(".linkedin.com"));
        on_linkedin && u.path().starts_with("/in/")
    })
}

/// Resolves relative (`/in/jane`), protocol-relative (`//www.linkedin.com/in/jane`)
/// and scheme-less (`linkedin.com/in/jane`) links to an absolute URL.
pub fn to_absolute_profile_url(url: &str) -> Option<String> {
    resolve(url.trim()).map(|u| u.to_string())
}

fn resolve(url: &str) -> Option<Url> {
    if url.is_empty() {
        return None;
    }

    let candidate = match url.starts_with('/') || url.contains("://") {
        true => url.to_string(),
        false => format!("https://{}", url),
    };

    Url::parse(LINKEDIN_ORIGIN).ok()?.join(&candidate).ok()
}
