//! Serializer registry: method → media type → serializer.
//!
//! The registry is validated once at construction and is read-only afterwards,
//! so it can be shared across requests behind an `Arc` without locking.

use std::collections::HashMap;

use crate::error::{ConfigError, DispatchError, NegotiationError, SerializeError};
use crate::media_type::{AcceptPreferences, MediaRange, MediaType};
use crate::Payload;

/// Converts a payload into a response body.
pub type Serializer = fn(&Payload) -> Result<Vec<u8>, SerializeError>;

/// Why a media type was chosen.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Selection {
    /// `?format=<alias>` named a registered media type.
    QueryAlias,
    /// A range of the `Accept` header matched.
    Accept,
    /// No usable preference; the method (or global) default applied.
    Default,
}

impl Selection {
    pub fn as_str(self) -> &'static str {
        match self {
            Selection::QueryAlias => "query_alias",
            Selection::Accept => "accept",
            Selection::Default => "default",
        }
    }
}

#[derive(Debug, Clone)]
struct MethodSerializers {
    entries: Vec<(MediaType, Serializer)>,
    /// Index into `entries` of the effective default.
    default: usize,
}

impl MethodSerializers {
    fn position(&self, media_type: &MediaType) -> Option<usize> {
        self.entries.iter().position(|(m, _)| m == media_type)
    }

    fn select_by_accept(&self, accept: &AcceptPreferences) -> Option<usize> {
        // Resolved once so the range walk stays linear in the header length.
        let excluded: Vec<bool> = self.entries.iter().map(|(m, _)| accept.excludes(m)).collect();
        let usable = |range: &MediaRange, i: usize| {
            range.matches(&self.entries[i].0) && !(range.is_wildcard() && excluded[i])
        };

        for range in accept.iter() {
            // Ranges are sorted by quality; everything after the first zero is zero too.
            if range.quality().is_zero() {
                break;
            }
            if usable(range, self.default) {
                return Some(self.default);
            }
            if let Some(i) = (0..self.entries.len()).find(|&i| usable(range, i)) {
                return Some(i);
            }
        }
        None
    }
}

/// Outcome of negotiation: the selected media type and its serializer.
#[derive(Debug, Clone, Copy)]
pub struct Negotiated<'r> {
    media_type: &'r MediaType,
    serializer: Serializer,
    selection: Selection,
}

impl<'r> Negotiated<'r> {
    pub fn media_type(&self) -> &'r MediaType {
        self.media_type
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn render(&self, payload: &Payload) -> Result<Rendered, SerializeError> {
        let body = (self.serializer)(payload)?;
        Ok(Rendered {
            media_type: self.media_type.clone(),
            body,
        })
    }
}

/// Serialized body together with the media type it was produced for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub media_type: MediaType,
    pub body: Vec<u8>,
}

/// Immutable two-level lookup table with validated defaults.
#[derive(Debug, Clone)]
pub struct SerializerRegistry {
    methods: HashMap<String, MethodSerializers>,
    aliases: HashMap<String, MediaType>,
}

impl SerializerRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Media types registered for `method`, in registration order.
    pub fn media_types(&self, method: &str) -> Vec<&MediaType> {
        self.methods
            .get(&method.to_ascii_uppercase())
            .map(|m| m.entries.iter().map(|(mt, _)| mt).collect())
            .unwrap_or_default()
    }

    /// Choose the serializer for `method`.
    ///
    /// Precedence: a `format` query alias naming one of the method's media types,
    /// then the best `Accept` match, then the method default (which falls back to
    /// the global default at build time).
    pub fn negotiate(
        &self,
        method: &str,
        accept: &AcceptPreferences,
        format: Option<&str>,
    ) -> Result<Negotiated<'_>, NegotiationError> {
        let method_key = method.to_ascii_uppercase();
        let serializers = self
            .methods
            .get(&method_key)
            .ok_or(NegotiationError::MethodNotRegistered(method_key))?;

        let by_alias = format
            .and_then(|f| self.aliases.get(&f.trim().to_ascii_lowercase()))
            .and_then(|mt| serializers.position(mt));

        let (index, selection) = if let Some(i) = by_alias {
            (i, Selection::QueryAlias)
        } else if let Some(i) = serializers.select_by_accept(accept) {
            (i, Selection::Accept)
        } else {
            (serializers.default, Selection::Default)
        };

        let (media_type, serializer) = &serializers.entries[index];
        Ok(Negotiated {
            media_type,
            serializer: *serializer,
            selection,
        })
    }

    /// Negotiate and serialize in one step.
    pub fn dispatch(
        &self,
        method: &str,
        accept: &AcceptPreferences,
        format: Option<&str>,
        payload: &Payload,
    ) -> Result<Rendered, DispatchError> {
        let negotiated = self.negotiate(method, accept, format)?;
        Ok(negotiated.render(payload)?)
    }
}

/// Collects registrations; all validation happens in [`RegistryBuilder::build`].
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    serializers: Vec<(String, String, Serializer)>,
    method_defaults: Vec<(String, String)>,
    default_media_type: Option<String>,
    aliases: Vec<(String, String)>,
}

impl RegistryBuilder {
    pub fn serializer(mut self, method: &str, media_type: &str, serializer: Serializer) -> Self {
        self.serializers
            .push((method.to_ascii_uppercase(), media_type.to_string(), serializer));
        self
    }

    pub fn method_default(mut self, method: &str, media_type: &str) -> Self {
        self.method_defaults
            .push((method.to_ascii_uppercase(), media_type.to_string()));
        self
    }

    pub fn default_media_type(mut self, media_type: &str) -> Self {
        self.default_media_type = Some(media_type.to_string());
        self
    }

    pub fn query_alias(mut self, alias: &str, media_type: &str) -> Self {
        self.aliases
            .push((alias.trim().to_ascii_lowercase(), media_type.to_string()));
        self
    }

    pub fn build(self) -> Result<SerializerRegistry, ConfigError> {
        if self.serializers.is_empty() {
            return Err(ConfigError::Empty);
        }

        let mut entries: HashMap<String, Vec<(MediaType, Serializer)>> = HashMap::new();
        for (method, raw, serializer) in self.serializers {
            let media_type = MediaType::parse(&raw).map_err(|source| ConfigError::InvalidMediaType {
                method: method.clone(),
                source,
            })?;
            let list = entries.entry(method.clone()).or_default();
            if list.iter().any(|(m, _)| *m == media_type) {
                return Err(ConfigError::DuplicateMediaType {
                    method,
                    media_type: media_type.to_string(),
                });
            }
            list.push((media_type, serializer));
        }

        let mut defaults: HashMap<String, MediaType> = HashMap::new();
        for (method, raw) in self.method_defaults {
            if !entries.contains_key(&method) {
                return Err(ConfigError::DefaultForUnknownMethod { method, media_type: raw });
            }
            let media_type = MediaType::parse(&raw).map_err(|source| ConfigError::InvalidMediaType {
                method: method.clone(),
                source,
            })?;
            defaults.insert(method, media_type);
        }

        let global_default = self
            .default_media_type
            .map(|raw| {
                MediaType::parse(&raw).map_err(|source| ConfigError::InvalidMediaType {
                    method: "*".to_string(),
                    source,
                })
            })
            .transpose()?;

        let mut methods = HashMap::with_capacity(entries.len());
        for (method, list) in entries {
            let default = defaults
                .remove(&method)
                .or_else(|| global_default.clone())
                .ok_or_else(|| ConfigError::MissingDefault(method.clone()))?;
            let index = list
                .iter()
                .position(|(m, _)| *m == default)
                .ok_or_else(|| ConfigError::DefaultNotRegistered {
                    method: method.clone(),
                    media_type: default.to_string(),
                })?;
            methods.insert(
                method,
                MethodSerializers {
                    entries: list,
                    default: index,
                },
            );
        }

        let mut aliases = HashMap::with_capacity(self.aliases.len());
        for (alias, raw) in self.aliases {
            let media_type = MediaType::parse(&raw)
                .map_err(|source| ConfigError::InvalidAlias { alias: alias.clone(), source })?;
            aliases.insert(alias, media_type);
        }

        Ok(SerializerRegistry { methods, aliases })
    }
}
