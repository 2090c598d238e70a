use std::cell::RefCell;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use super::*;
use crate::catalog::{ModelConfig, Provider};
use crate::error::ErrorKind;
use crate::host::tags_in_text;
use crate::prompt::Conversation;
use crate::provider::{ChatModel, ClientOptions, GenerationResult, ProviderError, ProviderRegistry};
use crate::settings::Settings;

/// In-memory host keyed by path.
#[derive(Default)]
struct MemoryHost {
    documents: RefCell<BTreeMap<PathBuf, String>>,
    notices: RefCell<Vec<String>>,
}

impl MemoryHost {
    fn with(documents: &[(&str, &str)]) -> Self {
        let host = Self::default();
        for (path, text) in documents {
            host.documents
                .borrow_mut()
                .insert(PathBuf::from(path), text.to_string());
        }
        host
    }

    fn text(&self, path: &str) -> String {
        self.documents.borrow()[Path::new(path)].clone()
    }
}

impl DocumentHost for MemoryHost {
    fn read_document(&self, path: &Path) -> Result<String, TaggerError> {
        self.documents.borrow().get(path).cloned().ok_or_else(|| {
            TaggerError::io(path, std::io::Error::from(std::io::ErrorKind::NotFound))
        })
    }

    fn all_documents(&self) -> Result<Vec<PathBuf>, TaggerError> {
        Ok(self.documents.borrow().keys().cloned().collect())
    }

    fn documents_in(&self, dir: &Path) -> Result<Vec<PathBuf>, TaggerError> {
        Ok(self
            .documents
            .borrow()
            .keys()
            .filter(|p| p.starts_with(dir))
            .cloned()
            .collect())
    }

    fn process_front_matter(
        &self,
        path: &Path,
        update: &mut dyn FnMut(&mut FrontMatter),
    ) -> Result<(), TaggerError> {
        let text = self.read_document(path)?;
        let updated = FrontMatter::apply(&text, update);
        self.documents
            .borrow_mut()
            .insert(path.to_path_buf(), updated);
        Ok(())
    }

    fn notify(&self, message: &str) {
        self.notices.borrow_mut().push(message.to_string());
    }
}

// Factories are plain fn pointers, so replies are staged in a global.
static REPLY: Mutex<Option<Result<GenerationResult, u16>>> = Mutex::new(None);
static LOCK: Mutex<()> = Mutex::new(());

struct Staged;

impl ChatModel for Staged {
    fn generate(&self, _: &Conversation) -> Result<GenerationResult, ProviderError> {
        match REPLY.lock().unwrap().clone() {
            Some(Ok(result)) => Ok(result),
            Some(Err(status)) => Err(ProviderError::Api {
                status,
                message: "Rate limit reached for requests".into(),
            }),
            None => Ok(GenerationResult::default()),
        }
    }
}

fn staged_factory(
    _: &'static ModelConfig,
    _: ClientOptions,
) -> Result<Box<dyn ChatModel>, ProviderError> {
    Ok(Box::new(Staged))
}

fn service(host: MemoryHost, settings: Settings) -> TaggingService<MemoryHost> {
    let mut registry = ProviderRegistry::empty();
    registry.register(Provider::Ollama, staged_factory);
    let settings = Settings {
        model: "llama3.2".into(),
        ..settings
    };
    TaggingService::new(host, TaggerHandle::with_registry(settings, registry))
}

fn stage(tags: &[&str], new_tags: &[&str]) {
    let owned = |v: &[&str]| v.iter().map(|s| s.to_string()).collect();
    *REPLY.lock().unwrap() = Some(Ok(GenerationResult::new(owned(tags), owned(new_tags))));
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn tag_document_filters_existing_and_writes_front_matter() {
    let _guard = LOCK.lock().unwrap_or_else(|e| e.into_inner());
    stage(&["#redis", "#security"], &["#docker"]);

    let host = MemoryHost::with(&[
        ("redis.md", "---\ntags: [redis, caching]\n---\nRedis runs in docker."),
        ("other.md", "About #security"),
    ]);
    let service = service(host, Settings::default());

    let added = service.tag_document(Path::new("redis.md")).unwrap();
    assert_eq!(added, strings(&["#security", "#docker"]));

    let text = service.host().text("redis.md");
    assert_eq!(
        tags_in_text(&text),
        strings(&["#redis", "#caching", "#security", "#docker"])
    );
    assert!(text.ends_with("Redis runs in docker."));
}

#[test]
fn document_without_front_matter_gains_block() {
    let _guard = LOCK.lock().unwrap_or_else(|e| e.into_inner());
    stage(&["#a"], &["#b"]);

    let service = service(MemoryHost::with(&[("n.md", "plain body")]), Settings::default());
    service.tag_document(Path::new("n.md")).unwrap();

    let text = service.host().text("n.md");
    let (fm, body) = FrontMatter::split(&text);
    assert_eq!(fm.unwrap().tags(), Some(strings(&["#a", "#b"])));
    assert_eq!(body, "plain body");
}

#[test]
fn lowercase_mode_is_applied_before_writing() {
    let _guard = LOCK.lock().unwrap_or_else(|e| e.into_inner());
    stage(&[], &["#DevOps"]);

    let settings = Settings {
        lower_case_mode: true,
        ..Settings::default()
    };
    let service = service(MemoryHost::with(&[("n.md", "text")]), settings);
    assert_eq!(
        service.tag_document(Path::new("n.md")).unwrap(),
        strings(&["#devops"])
    );
}

#[test]
fn selection_is_sent_instead_of_document() {
    let _guard = LOCK.lock().unwrap_or_else(|e| e.into_inner());
    stage(&[], &["#x"]);

    let service = service(MemoryHost::with(&[("n.md", "body")]), Settings::default());
    service
        .tag_selection(Path::new("n.md"), "only this part")
        .unwrap();
    assert!(service.host().text("n.md").starts_with("---\ntags: [\"#x\"]"));
}

#[test]
fn provider_failure_is_notified_with_fixed_message() {
    let _guard = LOCK.lock().unwrap_or_else(|e| e.into_inner());
    *REPLY.lock().unwrap() = Some(Err(429));

    let service = service(MemoryHost::with(&[("n.md", "body")]), Settings::default());
    let err = service.tag_document(Path::new("n.md")).unwrap_err();

    assert_eq!(err.kind(), Some(ErrorKind::RateLimited));
    let notices = service.host().notices.borrow();
    assert_eq!(notices.last().unwrap(), ErrorKind::RateLimited.message());
    assert_eq!(service.host().text("n.md"), "body");
}

#[test]
fn config_failure_is_notified_before_any_read() {
    let host = MemoryHost::with(&[("n.md", "body")]);
    let service = TaggingService::new(
        host,
        TaggerHandle::new(Settings {
            model: "unknown-model".into(),
            ..Settings::default()
        }),
    );

    let err = service.tag_document(Path::new("n.md")).unwrap_err();
    assert!(err.is_user_error());
    assert_eq!(
        service.host().notices.borrow().as_slice(),
        ["Model unknown-model is not supported."]
    );
}

#[test]
fn folder_tags_every_document_below_dir() {
    let _guard = LOCK.lock().unwrap_or_else(|e| e.into_inner());
    stage(&[], &["#new"]);

    let host = MemoryHost::with(&[
        ("dir/a.md", "a"),
        ("dir/sub/b.md", "b"),
        ("elsewhere.md", "c"),
    ]);
    let service = service(host, Settings::default());
    let report = service.tag_folder(Path::new("dir")).unwrap();

    assert_eq!(report.total(), 2);
    assert!(report.is_success());
    assert_eq!(service.host().text("elsewhere.md"), "c");
    assert!(service.host().text("dir/sub/b.md").contains("#new"));
    assert!(service.host().notices.borrow()[0].starts_with("Tagged 2 of 2 documents"));
}

#[test]
fn folder_continues_past_failures() {
    let _guard = LOCK.lock().unwrap_or_else(|e| e.into_inner());
    *REPLY.lock().unwrap() = Some(Err(429));

    let host = MemoryHost::with(&[("dir/a.md", "a"), ("dir/b.md", "b")]);
    let service = service(host, Settings::default());
    let report = service.tag_folder(Path::new("dir")).unwrap();

    assert_eq!(report.failed.len(), 2);
    assert!(report.tagged.is_empty());
    assert_eq!(report.failed[0].1, ErrorKind::RateLimited.message());

    let notices = service.host().notices.borrow();
    assert!(notices[0].starts_with("Tagged 0 of 2 documents"));
    assert_eq!(notices.len(), 3);
}

#[test]
fn shared_tagger_survives_reload_mid_flight() {
    let _guard = LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let service = service(MemoryHost::with(&[]), Settings::default());
    let in_flight: Arc<Tagger> = service.tagger().current().unwrap();

    let reloaded = service
        .tagger()
        .reload(Settings {
            model: "qwen2.5".into(),
            ..Settings::default()
        })
        .unwrap();

    assert_eq!(in_flight.model().model_id, "llama3.2");
    assert_eq!(reloaded.model().model_id, "qwen2.5");
}
