//! MemoryRepository: in-process repository emulation
//!
//! Serves the same HTTP API as a running repository from in-memory state,
//! no network needed. Every request is recorded so callers can inspect
//! what was sent.

use super::{RepoRequest, RepoResponse, Transport};
use crate::config::{HeaderNames, RepoConfig};
use crate::error::RepoResult;
use crate::mode::{MetadataMode, UpdateMode};
use crate::rdf::{
    Graph, Literal, Metadata, NamedNode, RdfFormat, RdfObject, RdfParser, RdfPredicate,
    RdfSerializer, RdfSubject, Triple, NTRIPLES_CONTENT_TYPE,
};
use crate::resource::{disposition_filename, REFERENCES_QUERY, RELATIVES_QUERY};
use crate::schema::Schema;
use crate::search::{form, SearchConfig, SearchTerm};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{CONTENT_DISPOSITION, CONTENT_TYPE, LOCATION};
use reqwest::{Method, StatusCode};
use sha2::{Digest, Sha256};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashSet, VecDeque};
use std::fmt::Display;
use tokio::sync::RwLock;
use tracing::debug;

/// A request as received by a [`MemoryRepository`]
#[derive(Debug, Clone)]
pub struct LoggedRequest {
    pub method: Method,
    /// URL relative to the API base
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Bytes,
}

impl LoggedRequest {
    /// First value of a header, compared case-insensitively
    pub fn header(&self, name: &str) -> Option<&str> {
        super::find_header(&self.headers, name)
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

#[derive(Debug, Clone, Default)]
struct StoredResource {
    graph: Graph,
    content: Bytes,
}

#[derive(Debug, Clone, Default)]
struct Store {
    last_id: u64,
    resources: BTreeMap<u64, StoredResource>,
    tombstones: BTreeSet<u64>,
}

#[derive(Debug, Default)]
struct MemoryState {
    store: Store,
    /// Active transaction and the store as it was when it began
    transaction: Option<(String, Store)>,
    transactions_started: u64,
    log: Vec<LoggedRequest>,
}

type Failure = (StatusCode, String);
type Handled = Result<RepoResponse, Failure>;

fn bad_request(e: impl Display) -> Failure {
    (StatusCode::BAD_REQUEST, e.to_string())
}

fn internal(e: impl Display) -> Failure {
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}

fn rdf_response(status: StatusCode, graph: &Graph) -> Handled {
    let body = RdfSerializer::serialize(graph, RdfFormat::NTriples).map_err(internal)?;
    Ok(RepoResponse::new(status)
        .with_header(CONTENT_TYPE.as_str(), NTRIPLES_CONTENT_TYPE)
        .with_body(body))
}

/// Repository held in memory.
///
/// Understands the metadata, content, tombstone, search and transaction
/// endpoints. Searches accept filter terms and the two queries used for
/// deletion ([`REFERENCES_QUERY`], [`RELATIVES_QUERY`]); any other SQL is
/// rejected with `400 Bad Request`.
pub struct MemoryRepository {
    base_url: String,
    headers: HeaderNames,
    schema: Schema,
    state: RwLock<MemoryState>,
}

impl MemoryRepository {
    /// Create an empty repository answering under `config`'s base URL
    pub fn new(config: &RepoConfig) -> Self {
        Self {
            base_url: config.base_url(),
            headers: config.rest.headers.clone(),
            schema: Schema::new(config.schema.clone()),
            state: RwLock::new(MemoryState::default()),
        }
    }

    /// Store a resource directly, bypassing the request log.
    ///
    /// The root triples of `metadata` are moved onto the new resource's URI
    /// and the URI itself is recorded as an identifier.
    pub async fn insert(&self, metadata: Metadata) -> RepoResult<NamedNode> {
        let mut state = self.state.write().await;
        let id = state.store.last_id + 1;
        let node = NamedNode::new(&self.uri_of(id))?;
        let root_triples = metadata.rebase(node.clone()).root_triples();
        let mut metadata = Metadata::from_graph(node.clone(), root_triples);
        if let Ok(id_property) = self.schema.id() {
            metadata.add_resource(id_property, node.clone());
        }
        state.store.last_id = id;
        state.store.resources.insert(
            id,
            StoredResource {
                graph: metadata.into_graph(),
                content: Bytes::new(),
            },
        );
        Ok(node)
    }

    /// Every request received so far, oldest first
    pub async fn requests(&self) -> Vec<LoggedRequest> {
        self.state.read().await.log.clone()
    }

    pub async fn clear_requests(&self) {
        self.state.write().await.log.clear();
    }

    /// Whether `uri` names a live resource
    pub async fn contains(&self, uri: &NamedNode) -> bool {
        let state = self.state.read().await;
        self.id_of(uri)
            .is_some_and(|id| state.store.resources.contains_key(&id))
    }

    /// Stored metadata of a live resource
    pub async fn metadata_of(&self, uri: &NamedNode) -> Option<Metadata> {
        let state = self.state.read().await;
        let id = self.id_of(uri)?;
        let stored = state.store.resources.get(&id)?;
        Some(Metadata::from_graph(uri.clone(), stored.graph.clone()))
    }

    /// Whether a deletion record exists for `uri`
    pub async fn has_tombstone(&self, uri: &NamedNode) -> bool {
        let state = self.state.read().await;
        self.id_of(uri)
            .is_some_and(|id| state.store.tombstones.contains(&id))
    }

    fn uri_of(&self, id: u64) -> String {
        format!("{}{}", self.base_url, id)
    }

    fn node(&self, id: u64) -> Result<NamedNode, Failure> {
        NamedNode::new(&self.uri_of(id)).map_err(internal)
    }

    fn id_of(&self, node: &NamedNode) -> Option<u64> {
        node.as_str().strip_prefix(&self.base_url)?.parse().ok()
    }

    fn dispatch(&self, state: &mut MemoryState, request: &RepoRequest, path: &str) -> Handled {
        let segments: Vec<&str> = path.split('/').collect();
        match (request.method.as_str(), segments.as_slice()) {
            ("POST", [""]) => self.create(&mut state.store, request),
            ("POST", ["search"]) => self.search(&state.store, request),
            (_, ["transaction"]) => self.transaction(state, request),
            (method, [id]) => {
                let id = parse_id(id)?;
                match method {
                    "GET" => self.get_content(&state.store, id),
                    "PUT" => self.put_content(&mut state.store, id, request),
                    "DELETE" => self.delete(&mut state.store, id),
                    _ => Err((StatusCode::METHOD_NOT_ALLOWED, method.to_string())),
                }
            }
            (method, [id, "metadata"]) => {
                let id = parse_id(id)?;
                match method {
                    "GET" => self.get_metadata(&state.store, id, request),
                    "PATCH" => self.patch_metadata(&mut state.store, id, request),
                    _ => Err((StatusCode::METHOD_NOT_ALLOWED, method.to_string())),
                }
            }
            ("DELETE", [id, "tombstone"]) => {
                let id = parse_id(id)?;
                if state.store.tombstones.remove(&id) {
                    Ok(RepoResponse::new(StatusCode::NO_CONTENT))
                } else {
                    Err((StatusCode::NOT_FOUND, format!("no tombstone for {}", id)))
                }
            }
            _ => Err((StatusCode::NOT_FOUND, path.to_string())),
        }
    }

    fn live<'a>(&self, store: &'a Store, id: u64) -> Result<&'a StoredResource, Failure> {
        if store.tombstones.contains(&id) {
            return Err((StatusCode::GONE, format!("resource {} has been deleted", id)));
        }
        store
            .resources
            .get(&id)
            .ok_or_else(|| (StatusCode::NOT_FOUND, format!("resource {} not found", id)))
    }

    fn live_mut<'a>(&self, store: &'a mut Store, id: u64) -> Result<&'a mut StoredResource, Failure> {
        if store.tombstones.contains(&id) {
            return Err((StatusCode::GONE, format!("resource {} has been deleted", id)));
        }
        store
            .resources
            .get_mut(&id)
            .ok_or_else(|| (StatusCode::NOT_FOUND, format!("resource {} not found", id)))
    }

    fn create(&self, store: &mut Store, request: &RepoRequest) -> Handled {
        let id = store.last_id + 1;
        let node = self.node(id)?;
        let mut metadata = Metadata::new(node.clone());
        if let Ok(id_property) = self.schema.id() {
            metadata.add_resource(id_property, node.clone());
        }
        let mut resource = StoredResource {
            graph: metadata.into_graph(),
            content: Bytes::new(),
        };
        if !request.body.is_empty() {
            self.store_content(&node, &mut resource, request);
        }
        store.last_id = id;
        store.resources.insert(id, resource);

        Ok(RepoResponse::new(StatusCode::CREATED).with_header(LOCATION.as_str(), node.as_str()))
    }

    /// Keep the body and refresh the metadata derived from it
    fn store_content(&self, node: &NamedNode, resource: &mut StoredResource, request: &RepoRequest) {
        let mut metadata = Metadata::from_graph(node.clone(), std::mem::take(&mut resource.graph));
        let size = i64::try_from(request.body.len()).unwrap_or(i64::MAX);
        let hash = format!("sha256:{:x}", Sha256::digest(&request.body));
        let derived = [
            (self.schema.binary_size(), Some(Literal::integer(size))),
            (self.schema.hash(), Some(Literal::new_simple_literal(hash))),
            (
                self.schema.mime(),
                request
                    .header_value(CONTENT_TYPE.as_str())
                    .map(Literal::new_simple_literal),
            ),
            (
                self.schema.file_name(),
                request
                    .header_value(CONTENT_DISPOSITION.as_str())
                    .and_then(disposition_filename)
                    .map(Literal::new_simple_literal),
            ),
        ];
        for (predicate, value) in derived {
            let Ok(predicate) = predicate else {
                continue;
            };
            metadata.delete_all(&predicate);
            if let Some(value) = value {
                metadata.add_literal(predicate, value);
            }
        }
        resource.graph = metadata.into_graph();
        resource.content = request.body.clone();
    }

    fn get_content(&self, store: &Store, id: u64) -> Handled {
        let resource = self.live(store, id)?;
        let mut response = RepoResponse::new(StatusCode::OK).with_body(resource.content.clone());
        let mime = self.schema.mime().ok().and_then(|p| {
            let node = self.node(id).ok()?;
            Metadata::from_graph(node, resource.graph.clone())
                .get_literal(&p)
                .map(|l| l.value().to_string())
        });
        if let Some(mime) = mime {
            response = response.with_header(CONTENT_TYPE.as_str(), mime);
        }
        Ok(response)
    }

    fn put_content(&self, store: &mut Store, id: u64, request: &RepoRequest) -> Handled {
        let node = self.node(id)?;
        let resource = self.live_mut(store, id)?;
        self.store_content(&node, resource, request);
        Ok(RepoResponse::new(StatusCode::NO_CONTENT))
    }

    fn delete(&self, store: &mut Store, id: u64) -> Handled {
        self.live(store, id)?;
        store.resources.remove(&id);
        store.tombstones.insert(id);
        Ok(RepoResponse::new(StatusCode::NO_CONTENT))
    }

    fn read_mode(&self, request: &RepoRequest) -> Result<MetadataMode, Failure> {
        request
            .header_value(&self.headers.metadata_read_mode)
            .map(str::parse::<MetadataMode>)
            .transpose()
            .map_err(bad_request)
            .map(Option::unwrap_or_default)
    }

    fn parent_property(&self, request: &RepoRequest) -> Result<Option<RdfPredicate>, Failure> {
        match request.header_value(&self.headers.metadata_parent_property) {
            Some(iri) => RdfPredicate::new(iri).map(Some).map_err(bad_request),
            None => Ok(self.schema.parent().ok()),
        }
    }

    fn get_metadata(&self, store: &Store, id: u64, request: &RepoRequest) -> Handled {
        self.live(store, id)?;
        let mode = self.read_mode(request)?;
        let parent = self.parent_property(request)?;
        let graph = self.scoped_graph(store, id, mode, parent.as_ref())?;
        rdf_response(StatusCode::OK, &graph)
    }

    fn patch_metadata(&self, store: &mut Store, id: u64, request: &RepoRequest) -> Handled {
        let node = self.node(id)?;
        let write_mode = request
            .header_value(&self.headers.metadata_write_mode)
            .map(str::parse::<UpdateMode>)
            .transpose()
            .map_err(bad_request)?
            .unwrap_or_default();
        let read_mode = self.read_mode(request)?;
        let parent = self.parent_property(request)?;

        let incoming = RdfParser::parse_response(
            &request.body,
            request.header_value(CONTENT_TYPE.as_str()),
            Some(node.as_str()),
        )
        .map_err(bad_request)?;
        let root = RdfSubject::NamedNode(node.clone());
        let marker = self.schema.delete().ok();

        let mut dropped = Vec::new();
        let mut patch = Graph::new();
        for triple in incoming.into_iter().filter(|t| t.subject == root) {
            if marker.as_ref() == Some(&triple.predicate) {
                if let Some(target) = triple.object.as_named_node() {
                    dropped.push(RdfPredicate::new(target.as_str()).map_err(bad_request)?);
                }
                continue;
            }
            patch.insert(triple);
        }

        let resource = self.live_mut(store, id)?;
        let mut metadata = Metadata::from_graph(node.clone(), std::mem::take(&mut resource.graph));
        match write_mode {
            UpdateMode::Add => {}
            UpdateMode::Overwrite => {
                let own_id = self
                    .schema
                    .id()
                    .ok()
                    .map(|p| Triple::new(root.clone(), p, RdfObject::NamedNode(node.clone())))
                    .filter(|t| metadata.graph().contains(t));
                metadata = Metadata::new(node.clone());
                if let Some(own_id) = own_id {
                    metadata.graph_mut().insert(own_id);
                }
            }
            UpdateMode::Merge => {
                for predicate in patch.predicates(&root) {
                    metadata.delete_all(&predicate);
                }
            }
        }
        metadata.graph_mut().extend(patch);
        for predicate in &dropped {
            metadata.delete_all(predicate);
        }
        resource.graph = metadata.into_graph();
        debug!("memory repository patched {} ({}, {} predicates dropped)", node, write_mode, dropped.len());

        let graph = self.scoped_graph(store, id, read_mode, parent.as_ref())?;
        rdf_response(StatusCode::OK, &graph)
    }

    /// Metadata of `id` in the given scope
    fn scoped_graph(
        &self,
        store: &Store,
        id: u64,
        mode: MetadataMode,
        parent: Option<&RdfPredicate>,
    ) -> Result<Graph, Failure> {
        let mut ids = vec![id];
        match mode {
            MetadataMode::Resource => {}
            MetadataMode::Neighbors => {
                let node = self.node(id)?;
                let root = RdfSubject::NamedNode(node.clone());
                if let Some(resource) = store.resources.get(&id) {
                    ids.extend(
                        resource
                            .graph
                            .iter()
                            .filter(|t| t.subject == root)
                            .filter_map(|t| t.object.as_named_node())
                            .filter_map(|n| self.id_of(n)),
                    );
                }
                ids.extend(self.referrers(store, &node, None));
            }
            MetadataMode::Relatives => {
                if let Some(parent) = parent {
                    ids.extend(self.relatives(store, id, parent)?.into_iter().map(|(_, id)| id));
                }
            }
        }

        let mut graph = Graph::new();
        let mut seen = HashSet::new();
        for id in ids {
            if !seen.insert(id) {
                continue;
            }
            if let Some(resource) = store.resources.get(&id) {
                graph.extend(resource.graph.iter().cloned());
            }
        }
        Ok(graph)
    }

    /// Live resources holding `target` as an object, by ascending id
    fn referrers(&self, store: &Store, target: &NamedNode, skip: Option<&RdfPredicate>) -> Vec<u64> {
        let object = RdfObject::NamedNode(target.clone());
        store
            .resources
            .iter()
            .filter(|(id, _)| Some(**id) != self.id_of(target))
            .filter(|(_, r)| {
                r.graph
                    .iter()
                    .any(|t| t.object == object && Some(&t.predicate) != skip)
            })
            .map(|(id, _)| *id)
            .collect()
    }

    /// Resources reachable from `start` over `property`, in both directions.
    ///
    /// Resources pointing at `start` get positive depths, resources `start`
    /// points at get negative ones; `start` itself has depth zero. Sorted by
    /// depth descending, then id.
    fn relatives(&self, store: &Store, start: u64, property: &RdfPredicate) -> Result<Vec<(i64, u64)>, Failure> {
        if !store.resources.contains_key(&start) {
            return Ok(Vec::new());
        }
        let mut found = vec![(0i64, start)];
        let mut visited = HashSet::from([start]);

        for direction in [1i64, -1] {
            let mut queue = VecDeque::from([(0i64, start)]);
            while let Some((depth, current)) = queue.pop_front() {
                let node = self.node(current)?;
                let next: Vec<u64> = if direction > 0 {
                    let object = RdfObject::NamedNode(node);
                    store
                        .resources
                        .iter()
                        .filter(|(_, r)| r.graph.iter().any(|t| &t.predicate == property && t.object == object))
                        .map(|(id, _)| *id)
                        .collect()
                } else {
                    let subject = RdfSubject::NamedNode(node);
                    store
                        .resources
                        .get(&current)
                        .map(|r| {
                            r.graph
                                .objects(&subject, property)
                                .filter_map(|o| o.as_named_node())
                                .filter_map(|n| self.id_of(n))
                                .filter(|id| store.resources.contains_key(id))
                                .collect()
                        })
                        .unwrap_or_default()
                };
                for id in next {
                    if visited.insert(id) {
                        found.push((depth + direction, id));
                        queue.push_back((depth + direction, id));
                    }
                }
            }
        }

        found.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
        Ok(found)
    }

    fn run_sql(&self, store: &Store, query: &str, params: &[String]) -> Result<Vec<u64>, Failure> {
        let param = |n: usize| {
            params
                .get(n)
                .ok_or_else(|| bad_request(format!("missing query parameter {}", n + 1)))
        };
        match query.trim() {
            REFERENCES_QUERY => {
                let id = parse_id(param(0)?)?;
                let target = self.node(id)?;
                let id_property = self.schema.id().ok();
                Ok(self.referrers(store, &target, id_property.as_ref()))
            }
            RELATIVES_QUERY => {
                let id = parse_id(param(0)?)?;
                let property = RdfPredicate::new(param(1)?).map_err(bad_request)?;
                Ok(self
                    .relatives(store, id, &property)?
                    .into_iter()
                    .map(|(_, id)| id)
                    .collect())
            }
            other => Err(bad_request(format!("unsupported query: {}", other))),
        }
    }

    fn match_terms(&self, store: &Store, terms: &[SearchTerm], order_by: &[String]) -> Result<Vec<u64>, Failure> {
        let mut matches = Vec::new();
        for (&id, resource) in &store.resources {
            let root = RdfSubject::NamedNode(self.node(id)?);
            let all = terms.iter().all(|term| {
                resource.graph.iter().any(|t| {
                    t.subject == root
                        && term.property.as_deref().map_or(true, |p| t.predicate.as_str() == p)
                        && term.matches_value(&t.object)
                })
            });
            if all {
                matches.push(id);
            }
        }

        if !order_by.is_empty() {
            let sort_value = |id: u64, property: &str| -> Option<String> {
                let resource = store.resources.get(&id)?;
                resource
                    .graph
                    .iter()
                    .find(|t| t.predicate.as_str() == property)
                    .map(|t| t.object.lexical().to_string())
            };
            matches.sort_by(|&a, &b| {
                for key in order_by {
                    let (property, descending) = match key.strip_prefix('^') {
                        Some(property) => (property, true),
                        None => (key.as_str(), false),
                    };
                    let ordering = compare_values(sort_value(a, property), sort_value(b, property));
                    let ordering = if descending { ordering.reverse() } else { ordering };
                    if ordering != Ordering::Equal {
                        return ordering;
                    }
                }
                a.cmp(&b)
            });
        }
        Ok(matches)
    }

    fn search(&self, store: &Store, request: &RepoRequest) -> Handled {
        let body = std::str::from_utf8(&request.body).map_err(bad_request)?;
        let pairs = form::decode(body);
        let config = SearchConfig::from_pairs(&pairs);
        let mode = self.read_mode(request)?;
        let parent = self.parent_property(request)?;

        let sql = pairs.iter().find(|(k, _)| k == "sql").map(|(_, v)| v.as_str());
        let ids = match sql {
            Some(query) => {
                let params: Vec<String> = pairs
                    .iter()
                    .filter(|(k, _)| k == "sqlParam[]")
                    .map(|(_, v)| v.clone())
                    .collect();
                self.run_sql(store, query, &params)?
            }
            None => {
                let terms = SearchTerm::from_form_data(&pairs).map_err(bad_request)?;
                self.match_terms(store, &terms, &config.order_by)?
            }
        };

        let total = ids.len();
        let offset = config.offset.map_or(0, |o| o as usize);
        let limit = config.limit.map_or(usize::MAX, |l| l as usize);
        let match_predicate = self.schema.search_match().map_err(internal)?;
        let order_predicate = self.schema.search_order().map_err(internal)?;
        let count_predicate = self.schema.search_count().map_err(internal)?;

        let mut graph = Graph::new();
        for (position, id) in ids.into_iter().skip(offset).take(limit).enumerate() {
            graph.extend(self.scoped_graph(store, id, mode, parent.as_ref())?);
            let subject = RdfSubject::NamedNode(self.node(id)?);
            graph.insert(Triple::new(
                subject.clone(),
                match_predicate.clone(),
                Literal::new_simple_literal("true").into(),
            ));
            graph.insert(Triple::new(
                subject,
                order_predicate.clone(),
                Literal::integer(position as i64).into(),
            ));
        }
        let base = NamedNode::new(&self.base_url).map_err(internal)?;
        graph.insert(Triple::new(
            RdfSubject::NamedNode(base),
            count_predicate,
            Literal::integer(total as i64).into(),
        ));
        rdf_response(StatusCode::OK, &graph)
    }

    fn transaction(&self, state: &mut MemoryState, request: &RepoRequest) -> Handled {
        if request.method == Method::POST {
            if state.transaction.is_some() {
                return Err((StatusCode::CONFLICT, "a transaction is already active".to_string()));
            }
            state.transactions_started += 1;
            let id = state.transactions_started.to_string();
            state.transaction = Some((id.clone(), state.store.clone()));
            return Ok(RepoResponse::new(StatusCode::CREATED)
                .with_header(self.headers.transaction_id.clone(), id));
        }

        let active = match &state.transaction {
            Some((active, _)) => active.clone(),
            None => return Err(bad_request("no active transaction")),
        };
        if request.header_value(&self.headers.transaction_id) != Some(active.as_str()) {
            return Err(bad_request(format!("unknown transaction, {} is active", active)));
        }
        match request.method.as_str() {
            "PUT" => state.transaction = None,
            "DELETE" => {
                if let Some((_, snapshot)) = state.transaction.take() {
                    state.store = snapshot;
                }
            }
            "PATCH" => {}
            method => return Err((StatusCode::METHOD_NOT_ALLOWED, method.to_string())),
        }
        Ok(RepoResponse::new(StatusCode::NO_CONTENT))
    }
}

fn parse_id(segment: &str) -> Result<u64, Failure> {
    segment
        .parse()
        .map_err(|_| (StatusCode::NOT_FOUND, format!("no resource {}", segment)))
}

/// Numeric comparison when both values are numbers; missing values sort last
fn compare_values(a: Option<String>, b: Option<String>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => match (a.parse::<f64>(), b.parse::<f64>()) {
            (Ok(x), Ok(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
            _ => a.cmp(&b),
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[async_trait]
impl Transport for MemoryRepository {
    async fn send(&self, request: RepoRequest) -> RepoResult<RepoResponse> {
        let path = request.url.strip_prefix(&self.base_url).map(str::to_string);
        let mut state = self.state.write().await;
        state.log.push(LoggedRequest {
            method: request.method.clone(),
            path: path.clone().unwrap_or_else(|| request.url.clone()),
            headers: request.headers.clone(),
            body: request.body.clone(),
        });

        let handled = match &path {
            Some(path) => self.dispatch(&mut state, &request, path),
            None => Err((StatusCode::NOT_FOUND, format!("{} is outside the repository", request.url))),
        };
        let response = handled.unwrap_or_else(|(status, message)| {
            RepoResponse::new(status)
                .with_header(CONTENT_TYPE.as_str(), "text/plain")
                .with_body(message)
        });
        debug!("memory repository {} {} -> {}", request.method, request.url, response.status);
        Ok(response)
    }
}
