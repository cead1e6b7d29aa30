/*!
# Tag to type resolution

A [`Resolver`] turns a tag name into a fresh [`Element`] by probing an
ordered list of [`Candidate`]s against a [`Registry`]. The first candidate
whose qualified identity is registered wins.
*/
use crate::element::Element;
use crate::error::{Error, Result};
use crate::fallback::FallbackElement;
use crate::registry::{qualify, Constructor, Registry, RcPtr};

/// One (namespace, prefix) pair tried during resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
	pub namespace: String,
	pub prefix: String,
}

impl Candidate {
	pub fn new<N: Into<String>, P: Into<String>>(namespace: N, prefix: P) -> Candidate {
		Candidate{
			namespace: namespace.into(),
			prefix: prefix.into(),
		}
	}

	/// The identity `tag` resolves to under this candidate.
	pub fn identity(&self, tag: &str) -> String {
		qualify(&self.namespace, &self.prefix, tag)
	}
}

/**
# Resolution policy

Without candidates every tag resolves to a [`FallbackElement`] and unknown
tags are always tolerated.

## Example

```
use xmlbind::ResolverConfig;

let config = ResolverConfig::new(
	Some(vec!["com.example".to_string()]),
	Some(vec!["Xml".to_string()]),
	false,
).unwrap();
assert_eq!(config.candidates().unwrap().len(), 1);

assert!(ResolverConfig::new(Some(vec![]), None, true).is_err());
```
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverConfig {
	candidates: Option<Vec<Candidate>>,
	ignore_unknown_tags: bool,
}

impl ResolverConfig {
	/// Build a configuration from two parallel candidate lists.
	///
	/// Both lists must be present or absent together and of equal length.
	/// If both are absent, unknown tags are tolerated regardless of
	/// `ignore_unknown_tags`. Empty lists are only accepted together with
	/// tolerance of unknown tags, as no tag could ever resolve otherwise.
	pub fn new(
			namespaces: Option<Vec<String>>,
			prefixes: Option<Vec<String>>,
			ignore_unknown_tags: bool,
			) -> Result<ResolverConfig>
	{
		match (namespaces, prefixes) {
			(None, None) => Ok(ResolverConfig::fallback_only()),
			(Some(_), None) | (None, Some(_)) => Err(Error::Configuration(
				"namespace and prefix candidate lists must be both present or both absent",
			)),
			(Some(namespaces), Some(prefixes)) => {
				if namespaces.len() != prefixes.len() {
					return Err(Error::Configuration(
						"namespace and prefix candidate lists must have the same length",
					));
				}
				if namespaces.len() == 0 && !ignore_unknown_tags {
					return Err(Error::Configuration(
						"empty candidate lists require unknown tags to be ignored",
					));
				}
				let candidates = namespaces.into_iter()
					.zip(prefixes.into_iter())
					.map(|(ns, prefix)| Candidate::new(ns, prefix))
					.collect();
				Ok(ResolverConfig{
					candidates: Some(candidates),
					ignore_unknown_tags,
				})
			},
		}
	}

	/// Resolve every tag to a [`FallbackElement`].
	pub fn fallback_only() -> ResolverConfig {
		ResolverConfig{
			candidates: None,
			ignore_unknown_tags: true,
		}
	}

	/// Append a candidate, creating the candidate list if needed.
	pub fn candidate<N: Into<String>, P: Into<String>>(&mut self, namespace: N, prefix: P) -> &mut ResolverConfig {
		self.candidates.get_or_insert_with(Vec::new).push(Candidate::new(namespace, prefix));
		self
	}

	/// Set whether unknown tags produce a [`FallbackElement`].
	///
	/// Has no effect while no candidates are configured. Refused for an
	/// empty candidate list, like in [`ResolverConfig::new`].
	pub fn ignore_unknown_tags(&mut self, v: bool) -> Result<&mut ResolverConfig> {
		match self.candidates.as_ref() {
			Some(candidates) if candidates.len() == 0 && !v => Err(Error::Configuration(
				"empty candidate lists require unknown tags to be ignored",
			)),
			_ => {
				self.ignore_unknown_tags = v;
				Ok(self)
			},
		}
	}

	pub fn candidates(&self) -> Option<&[Candidate]> {
		self.candidates.as_deref()
	}

	/// Effective tolerance of unknown tags.
	pub fn ignores_unknown_tags(&self) -> bool {
		self.candidates.is_none() || self.ignore_unknown_tags
	}
}

impl Default for ResolverConfig {
	fn default() -> ResolverConfig {
		ResolverConfig::fallback_only()
	}
}

/// Tag resolution against a shared [`Registry`].
#[derive(Debug, Clone)]
pub struct Resolver {
	registry: RcPtr<Registry>,
	config: ResolverConfig,
}

impl Resolver {
	pub fn new(registry: RcPtr<Registry>, config: ResolverConfig) -> Resolver {
		Resolver{ registry, config }
	}

	pub fn config(&self) -> &ResolverConfig {
		&self.config
	}

	pub fn registry(&self) -> &Registry {
		&self.registry
	}

	/// Construct a fresh element for `tag`.
	///
	/// The returned errors carry no position; the caller knows better.
	pub fn resolve(&self, tag: &str) -> Result<Box<dyn Element>> {
		let candidates = match self.config.candidates.as_ref() {
			None => {
				log::trace!(target: "xmlbind::resolver", "no candidates configured, {} resolves to fallback", tag);
				return Ok(Box::new(FallbackElement::new(tag)));
			},
			Some(candidates) => candidates,
		};
		for candidate in candidates.iter() {
			let identity = candidate.identity(tag);
			match self.registry.lookup(&identity) {
				None => {
					log::trace!(target: "xmlbind::resolver", "{} not registered", identity);
				},
				Some(Constructor::Available(factory)) => {
					log::trace!(target: "xmlbind::resolver", "{} resolved to {}", tag, identity);
					return Ok(factory());
				},
				Some(Constructor::Restricted) => {
					return Err(Error::InaccessibleConstructor{
						tag: tag.to_string(),
						identity,
						position: None,
					});
				},
			}
		}
		if self.config.ignore_unknown_tags {
			log::debug!(target: "xmlbind::resolver", "unknown tag {}, using fallback element", tag);
			Ok(Box::new(FallbackElement::new(tag)))
		} else {
			Err(Error::UnresolvedTag{
				tag: tag.to_string(),
				position: None,
			})
		}
	}
}
