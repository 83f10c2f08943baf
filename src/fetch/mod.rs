//! Repository URL parsing and archive download

use reqwest::blocking::Client;
use std::fmt;
use tracing::{debug, info};
use url::Url;

use crate::error::{Error, Result};

const USER_AGENT: &str = concat!("repo2file/", env!("CARGO_PKG_VERSION"));

/// Supported hosting providers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Host {
    GitHub,
    GitLab,
}

impl Host {
    fn from_domain(domain: &str) -> Option<Self> {
        match domain.trim_start_matches("www.") {
            "github.com" => Some(Host::GitHub),
            "gitlab.com" => Some(Host::GitLab),
            _ => None,
        }
    }

    pub fn domain(&self) -> &'static str {
        match self {
            Host::GitHub => "github.com",
            Host::GitLab => "gitlab.com",
        }
    }
}

/// Whether the ref names a branch or a tag. Only GitHub archive URLs differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RefKind {
    #[default]
    Branch,
    Tag,
}

/// A parsed repository location plus the snapshot to fetch
#[derive(Clone)]
pub struct RepositoryReference {
    pub host: Host,
    pub scheme: String,
    /// Owner, or `group/subgroup` on GitLab
    pub owner: String,
    pub name: String,
    pub ref_: String,
    pub ref_kind: RefKind,
    token: Option<String>,
}

impl fmt::Debug for RepositoryReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RepositoryReference")
            .field("host", &self.host)
            .field("owner", &self.owner)
            .field("name", &self.name)
            .field("ref", &self.ref_)
            .field("ref_kind", &self.ref_kind)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl RepositoryReference {
    /// Parse `repo_url` (scheme optional, `.git` suffix and trailing path tolerated).
    pub fn parse(
        repo_url: &str,
        ref_: &str,
        ref_kind: RefKind,
        token: Option<String>,
    ) -> Result<Self> {
        let trimmed = repo_url.trim();
        let with_scheme = if trimmed.contains("://") {
            trimmed.to_string()
        } else {
            format!("https://{trimmed}")
        };
        let invalid = |reason: &str| Error::InvalidUrl {
            url: repo_url.to_string(),
            reason: reason.to_string(),
        };

        let parsed = Url::parse(&with_scheme).map_err(|e| invalid(&e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(invalid("only http(s) URLs are supported"));
        }
        let domain = parsed.host_str().ok_or_else(|| invalid("missing host"))?.to_ascii_lowercase();
        let host = Host::from_domain(&domain).ok_or(Error::UnsupportedHost(domain))?;

        let segments: Vec<&str> = parsed
            .path_segments()
            .map(|s| s.filter(|seg| !seg.is_empty()).collect())
            .unwrap_or_default();

        let (owner, name) = match host {
            Host::GitHub => match segments.as_slice() {
                [owner, name, ..] => (owner.to_string(), name.to_string()),
                _ => return Err(invalid("expected https://github.com/<owner>/<repo>")),
            },
            Host::GitLab => {
                // Everything before the `/-/` marker is the project path.
                let project: Vec<&str> = segments.iter().copied().take_while(|s| *s != "-").collect();
                match project.split_last() {
                    Some((name, owner)) if !owner.is_empty() => (owner.join("/"), name.to_string()),
                    _ => return Err(invalid("expected https://gitlab.com/<group>/<project>")),
                }
            }
        };
        let name = name.strip_suffix(".git").unwrap_or(&name).to_string();
        if name.is_empty() {
            return Err(invalid("empty repository name"));
        }

        let ref_ = ref_.trim();
        if ref_.is_empty() {
            return Err(invalid("empty ref"));
        }

        Ok(Self {
            host,
            scheme: parsed.scheme().to_string(),
            owner,
            name,
            ref_: ref_.to_string(),
            ref_kind,
            token: token.filter(|t| !t.trim().is_empty()),
        })
    }

    /// Canonical web URL of the repository, without `.git`.
    pub fn web_url(&self) -> String {
        format!("{}://{}/{}/{}", self.scheme, self.host.domain(), self.owner, self.name)
    }

    /// Download URL of the ZIP snapshot for this ref.
    pub fn archive_url(&self) -> String {
        match self.host {
            Host::GitHub => {
                let kind = match self.ref_kind {
                    RefKind::Branch => "heads",
                    RefKind::Tag => "tags",
                };
                format!("{}/archive/refs/{}/{}.zip", self.web_url(), kind, self.ref_)
            }
            Host::GitLab => format!(
                "{}/-/archive/{}/{}-{}.zip",
                self.web_url(),
                self.ref_,
                self.name,
                self.ref_.replace('/', "-")
            ),
        }
    }

    /// Header carrying the access token, if one was given.
    pub fn auth_header(&self) -> Option<(&'static str, String)> {
        let token = self.token.as_deref()?;
        Some(match self.host {
            Host::GitHub => ("Authorization", format!("Bearer {token}")),
            Host::GitLab => ("PRIVATE-TOKEN", token.to_string()),
        })
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }
}

/// Fetch the raw archive bytes for `repo`.
pub fn download_archive(repo: &RepositoryReference) -> Result<Vec<u8>> {
    let url = repo.archive_url();
    debug!(%url, authenticated = repo.has_token(), "requesting archive");
    fetch_url(&url, repo.auth_header())
}

/// GET `url`, sending `auth` as a header when present. Any non-2xx status is
/// fatal; nothing is retried.
pub fn fetch_url(url: &str, auth: Option<(&str, String)>) -> Result<Vec<u8>> {
    let client = Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .map_err(|source| Error::Transport { url: url.to_string(), source })?;
    fetch_with(&client, url, auth)
}

fn fetch_with(client: &Client, url: &str, auth: Option<(&str, String)>) -> Result<Vec<u8>> {
    let transport = |source: reqwest::Error| Error::Transport { url: url.to_string(), source };

    let mut request = client.get(url);
    if let Some((name, value)) = auth {
        request = request.header(name, value);
    }

    let response = request.send().map_err(transport)?;
    let status = response.status();
    if !status.is_success() {
        return Err(Error::HttpStatus { url: url.to_string(), status: status.as_u16() });
    }

    let bytes = response.bytes().map_err(transport)?;
    info!(%url, bytes = bytes.len(), "downloaded archive");
    Ok(bytes.to_vec())
}
