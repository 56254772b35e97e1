//! Ordered fallback chain for locating a named artifact.
//!
//! Each artifact kind declares a list of candidate [`Source`]s. Sources are
//! evaluated lazily in order: a source yields at most one candidate name,
//! that name is fetched, and the first successful fetch ends the chain.
//! Sources after a success never run.

use crate::observability::metrics;
use crate::resolution::fuzzy;
use crate::upstream::{BackendClient, UpstreamError, UpstreamReply};

/// Family of backend-stored artifacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    /// Generated interview question sets (`/api/questions/<name>`).
    Questions,
    /// Evaluation results (`/api/view_result?hint=<name>`).
    Result,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 2] = [ArtifactKind::Questions, ArtifactKind::Result];

    /// Candidate sources, in evaluation order.
    pub fn sources(self) -> &'static [Source] {
        match self {
            ArtifactKind::Questions => &[Source::HintOrRequested, Source::Latest],
            ArtifactKind::Result => &[Source::Requested, Source::Hint, Source::Listing],
        }
    }

    /// Backend calls made when every source runs and misses.
    pub fn max_backend_calls(self) -> u64 {
        self.sources().iter().map(|s| s.max_backend_calls()).sum()
    }

    /// Error label used when every source is exhausted.
    pub fn failure_label(self) -> &'static str {
        match self {
            ArtifactKind::Questions => "Failed to fetch questions",
            ArtifactKind::Result => "Failed to fetch result",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ArtifactKind::Questions => "questions",
            ArtifactKind::Result => "result",
        }
    }
}

/// Where a candidate name comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// The name exactly as requested.
    Requested,
    /// The backend's resolve-by-hint match, else the requested name.
    HintOrRequested,
    /// The backend's resolve-by-hint match; skipped when there is none.
    Hint,
    /// The backend's most recently produced file of this kind.
    Latest,
    /// First fuzzy match in the backend's result listing.
    Listing,
}

impl Source {
    /// The candidate lookup, if any, plus the artifact fetch.
    pub fn max_backend_calls(self) -> u64 {
        match self {
            Source::Requested => 1,
            Source::HintOrRequested | Source::Hint | Source::Latest | Source::Listing => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Source::Requested => "requested",
            Source::HintOrRequested => "hint_or_requested",
            Source::Hint => "hint",
            Source::Latest => "latest",
            Source::Listing => "listing",
        }
    }
}

/// Longest run of sequential backend calls any resolving route can make.
pub fn longest_chain() -> u64 {
    ArtifactKind::ALL
        .iter()
        .map(|kind| kind.max_backend_calls())
        .max()
        .unwrap_or(1)
}

/// One fetch made by the chain.
#[derive(Debug, Clone)]
pub struct Attempt {
    pub source: Source,
    /// Name the artifact was fetched under.
    pub name: String,
    pub reply: UpstreamReply,
}

/// Outcome of running a chain.
#[derive(Debug, Clone)]
pub enum Resolution {
    /// A fetch succeeded; later sources were not consulted.
    Found(Attempt),
    /// Every source was consulted. Holds the last fetch made, if any.
    Exhausted(Option<Attempt>),
}

/// Runs the fallback chain of one artifact kind against the backend.
pub struct Resolver<'a> {
    client: &'a BackendClient,
    kind: ArtifactKind,
}

impl<'a> Resolver<'a> {
    pub fn new(client: &'a BackendClient, kind: ArtifactKind) -> Self {
        Self { client, kind }
    }

    /// Resolve `requested` to a served artifact.
    ///
    /// Lookup failures only skip a source. A transport failure while fetching
    /// the artifact itself aborts the chain.
    pub async fn resolve(&self, requested: &str) -> Result<Resolution, UpstreamError> {
        let mut last = None;

        for &source in self.kind.sources() {
            let Some(name) = self.candidate(source, requested).await else {
                tracing::debug!(
                    kind = self.kind.as_str(),
                    source = source.as_str(),
                    "No candidate"
                );
                metrics::record_resolution_step(self.kind.as_str(), source.as_str(), "skipped");
                continue;
            };

            let reply = self.fetch(&name).await?;
            let attempt = Attempt {
                source,
                name,
                reply,
            };

            if attempt.reply.is_success() {
                tracing::debug!(
                    kind = self.kind.as_str(),
                    source = source.as_str(),
                    name = %attempt.name,
                    "Artifact served"
                );
                metrics::record_resolution_step(self.kind.as_str(), source.as_str(), "served");
                return Ok(Resolution::Found(attempt));
            }

            tracing::debug!(
                kind = self.kind.as_str(),
                source = source.as_str(),
                name = %attempt.name,
                status = %attempt.reply.status,
                "Artifact fetch missed"
            );
            metrics::record_resolution_step(self.kind.as_str(), source.as_str(), "missed");
            last = Some(attempt);
        }

        Ok(Resolution::Exhausted(last))
    }

    async fn candidate(&self, source: Source, requested: &str) -> Option<String> {
        match source {
            Source::Requested => Some(requested.to_string()),
            Source::HintOrRequested => Some(
                self.hint(requested)
                    .await
                    .unwrap_or_else(|| requested.to_string()),
            ),
            Source::Hint => self.hint(requested).await,
            Source::Latest => match self.kind {
                ArtifactKind::Questions => self.client.latest_questions_file().await,
                ArtifactKind::Result => None,
            },
            Source::Listing => {
                let names = self.client.result_filenames().await?;
                fuzzy::best_match(requested, names.iter().map(String::as_str)).map(str::to_string)
            }
        }
    }

    async fn hint(&self, requested: &str) -> Option<String> {
        match self.kind {
            ArtifactKind::Questions => self.client.resolve_questions_file(requested).await,
            ArtifactKind::Result => self.client.resolve_result_file(requested).await,
        }
    }

    async fn fetch(&self, name: &str) -> Result<UpstreamReply, UpstreamError> {
        match self.kind {
            ArtifactKind::Questions => self.client.questions(name).await,
            ArtifactKind::Result => self.client.view_result(name).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_questions_chain_order() {
        assert_eq!(
            ArtifactKind::Questions.sources(),
            &[Source::HintOrRequested, Source::Latest]
        );
    }

    #[test]
    fn test_result_chain_tries_requested_name_first() {
        assert_eq!(
            ArtifactKind::Result.sources(),
            &[Source::Requested, Source::Hint, Source::Listing]
        );
    }

    #[test]
    fn test_worst_case_call_counts() {
        // resolve, fetch, latest, fetch
        assert_eq!(ArtifactKind::Questions.max_backend_calls(), 4);
        // fetch, resolve, fetch, listing, fetch
        assert_eq!(ArtifactKind::Result.max_backend_calls(), 5);
        assert_eq!(longest_chain(), 5);
    }
}
