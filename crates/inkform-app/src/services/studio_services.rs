// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Central service layer. Ties the scanner, client store, consent renderer,
// document vault and audit trail together behind one cloneable handle.
//
// The SQLite-backed store and audit log are `Send` but not `Sync`, so both
// sit behind `Arc<Mutex<>>`. Locks are only held for single queries.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use inkform_consent::{ConsentForm, ConsentPdfRenderer, RenderRequest, SignatureStrokes};
use inkform_core::AppConfig;
use inkform_core::error::{InkformError, Result};
use inkform_core::types::{ClientId, ClientRecord, FormId, FormType, ScanId};
use inkform_scan::{IdScanner, ScanOutcome, ScanReport, ScanSettings, TextRecognizer};
use inkform_security::{AuditAction, AuditEntry, AuditLog, EncryptedStorage, hash_bytes};
use inkform_store::{ClientStore, ScanRecord};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use super::data_dir::{self, AUDIT_FILE, DATABASE_FILE, DOCUMENTS_DIR};
use super::vault::DocumentVault;

/// Signature image size handed to the PDF renderer, in pixels.
const SIGNATURE_WIDTH: u32 = 600;
const SIGNATURE_HEIGHT: u32 = 200;

/// What one scan produced, and where it was recorded.
#[derive(Debug, Clone, Serialize)]
pub struct ScanResult {
    pub scan_id: ScanId,
    pub outcome: ScanOutcome,
    /// Digest of the source photo (or of the recognised text for text-only
    /// scans). Successful photos are kept in the vault under this key.
    pub image_hash: String,
}

#[derive(Clone)]
pub struct StudioServices {
    store: Arc<Mutex<ClientStore>>,
    audit_log: Arc<Mutex<AuditLog>>,
    vault: DocumentVault,
    recognizer: Arc<dyn TextRecognizer>,
    config: Arc<Mutex<AppConfig>>,
    data_dir: Option<PathBuf>,
}

fn locked<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl StudioServices {
    /// Open (or create) a studio data directory.
    ///
    /// `passphrase` unlocks the document vault. When the config asks for
    /// encryption but no passphrase is given, documents are stored in the
    /// clear and a warning is logged.
    #[instrument(skip_all, fields(path = %data_dir.as_ref().display()))]
    pub fn open(
        data_dir: impl AsRef<Path>,
        passphrase: Option<&str>,
        recognizer: Arc<dyn TextRecognizer>,
    ) -> Result<Self> {
        let dir = data_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)?;

        let config = data_dir::load_config(&dir);
        let store = ClientStore::open(dir.join(DATABASE_FILE))?;
        let audit_log = AuditLog::open(dir.join(AUDIT_FILE))?;

        let passphrase = passphrase.filter(|p| !p.is_empty());
        let cipher = match (config.encryption_enabled, passphrase) {
            (true, Some(p)) => Some(EncryptedStorage::new(p)),
            (true, None) => {
                warn!("encryption is enabled but no passphrase was given; documents are stored unencrypted");
                None
            }
            (false, _) => None,
        };
        let vault = DocumentVault::on_disk(dir.join(DOCUMENTS_DIR), cipher)?;

        info!(
            encrypted = vault.is_encrypted(),
            engine = recognizer.name(),
            "studio services initialised"
        );

        Ok(Self {
            store: Arc::new(Mutex::new(store)),
            audit_log: Arc::new(Mutex::new(audit_log)),
            vault,
            recognizer,
            config: Arc::new(Mutex::new(config)),
            data_dir: Some(dir),
        })
    }

    /// Everything in memory; nothing touches disk. Used by tests and demos.
    pub fn in_memory(config: AppConfig, recognizer: Arc<dyn TextRecognizer>) -> Result<Self> {
        Ok(Self {
            store: Arc::new(Mutex::new(ClientStore::open_in_memory()?)),
            audit_log: Arc::new(Mutex::new(AuditLog::open_in_memory()?)),
            vault: DocumentVault::in_memory(None),
            recognizer,
            config: Arc::new(Mutex::new(config)),
            data_dir: None,
        })
    }

    // -- ID scanning ---------------------------------------------------------

    /// A scanner configured from the current settings.
    pub fn scanner(&self) -> IdScanner {
        let settings = ScanSettings::from(&*locked(&self.config));
        IdScanner::new(settings, Arc::clone(&self.recognizer))
    }

    /// Scan a photo of an ID and record the attempt.
    ///
    /// A failed scan is still `Ok`: the failure lives in the outcome.
    #[instrument(skip_all, fields(bytes = image_bytes.len()))]
    pub fn scan_id(&self, image_bytes: &[u8]) -> Result<ScanResult> {
        let report = self.scanner().scan_detailed(image_bytes);
        let keep = report.outcome.is_success().then_some(image_bytes);
        self.record_scan(report, hash_bytes(image_bytes), keep)
    }

    /// Like [`Self::scan_id`], on the blocking thread pool.
    pub async fn scan_id_async(&self, image_bytes: Vec<u8>) -> Result<ScanResult> {
        let services = self.clone();
        tokio::task::spawn_blocking(move || services.scan_id(&image_bytes))
            .await
            .map_err(|e| InkformError::Task(e.to_string()))?
    }

    /// Parse text that a host-side OCR service already recognised.
    #[instrument(skip_all, fields(lines = lines.len()))]
    pub fn scan_text(&self, lines: &[String]) -> Result<ScanResult> {
        let report = ScanReport {
            outcome: self.scanner().scan_lines(lines),
            quality: None,
        };
        let text_hash = hash_bytes(lines.join("\n").as_bytes());
        self.record_scan(report, text_hash, None)
    }

    /// Insert the scan record, filing `keep` in the vault first when given.
    fn record_scan(&self, report: ScanReport, hash: String, keep: Option<&[u8]>) -> Result<ScanResult> {
        let record = ScanRecord::from_report(&report, hash);
        {
            // Vault writes and removals both happen under the store lock, so
            // a blob is never removed between being stored and referenced.
            let store = locked(&self.store);
            if let Some(bytes) = keep {
                self.vault.store(bytes)?;
            }
            store.insert_scan(&record)?;
        }
        self.audit(
            AuditAction::IdScan,
            &record.id.to_string(),
            report.outcome.is_success(),
            report.outcome.error_message(),
        );
        Ok(ScanResult {
            scan_id: record.id,
            outcome: report.outcome,
            image_hash: record.image_hash,
        })
    }

    /// Create a client from a successful scan and link the scan to it.
    #[instrument(skip_all, fields(scan_id = %scan.scan_id))]
    pub fn create_client_from_scan(&self, scan: &ScanResult) -> Result<ClientRecord> {
        if let Some(message) = scan.outcome.error_message() {
            return Err(InkformError::ScanRejected(message.to_owned()));
        }
        let client = ClientRecord::from_scan(scan.outcome.extracted_info())
            .ok_or_else(|| InkformError::ScanRejected("no name on the document".into()))?;

        {
            let store = locked(&self.store);
            store.insert_client(&client)?;
            store.link_scan(&scan.scan_id, &client.id)?;
        }
        self.audit(
            AuditAction::ClientCreated,
            &client.id.to_string(),
            true,
            Some(&format!("from scan {}", scan.scan_id)),
        );
        info!(client_id = %client.id, "client created from ID scan");
        Ok(client)
    }

    // -- Clients -------------------------------------------------------------

    pub fn add_client(&self, client: &ClientRecord) -> Result<()> {
        locked(&self.store).insert_client(client)?;
        self.audit(AuditAction::ClientCreated, &client.id.to_string(), true, None);
        Ok(())
    }

    pub fn update_client(&self, client: &ClientRecord) -> Result<()> {
        let result = locked(&self.store).update_client(client);
        self.audit(
            AuditAction::ClientUpdated,
            &client.id.to_string(),
            result.is_ok(),
            None,
        );
        result
    }

    pub fn get_client(&self, id: &ClientId) -> Result<Option<ClientRecord>> {
        locked(&self.store).get_client(id)
    }

    pub fn all_clients(&self) -> Result<Vec<ClientRecord>> {
        locked(&self.store).all_clients()
    }

    pub fn search_clients(&self, query: &str) -> Result<Vec<ClientRecord>> {
        locked(&self.store).search_clients(query)
    }

    /// Delete a client with their scans and forms. Stored photos and PDFs
    /// behind them are removed unless another record still refers to the
    /// same document. Returns `false` if the client did not exist.
    #[instrument(skip_all, fields(client_id = %id))]
    pub fn delete_client(&self, id: &ClientId) -> Result<bool> {
        let store = locked(&self.store);
        let mut documents: Vec<String> = store
            .scans_for_client(id)?
            .into_iter()
            .map(|scan| scan.image_hash)
            .collect();
        documents.extend(
            store
                .forms_for_client(id)?
                .into_iter()
                .filter_map(|form| form.document_hash),
        );
        documents.sort_unstable();
        documents.dedup();

        if !store.delete_client(id)? {
            return Ok(false);
        }

        let mut removed = 0usize;
        let mut shared = 0usize;
        for hash in &documents {
            if store.document_in_use(hash)? {
                shared += 1;
                continue;
            }
            match self.vault.remove(hash) {
                Ok(true) => removed += 1,
                Ok(false) => {}
                Err(err) => warn!(%hash, %err, "could not remove client document"),
            }
        }
        drop(store);

        debug!(removed, shared, "client documents cleaned up");
        self.audit(
            AuditAction::ClientDeleted,
            &id.to_string(),
            true,
            Some(&format!("{removed} documents removed, {shared} still shared")),
        );
        Ok(true)
    }

    // -- Consent forms -------------------------------------------------------

    /// Start a consent form for an existing client, pre-filled and saved.
    pub fn new_consent_form(&self, client_id: &ClientId, form_type: FormType) -> Result<ConsentForm> {
        let store = locked(&self.store);
        let client = store
            .get_client(client_id)?
            .ok_or_else(|| InkformError::NotFound(format!("client {client_id}")))?;
        let form = ConsentForm::for_client(form_type, &client);
        store.save_form(&form)?;
        Ok(form)
    }

    pub fn save_form(&self, form: &ConsentForm) -> Result<()> {
        locked(&self.store).save_form(form)
    }

    pub fn get_form(&self, id: &FormId) -> Result<Option<ConsentForm>> {
        locked(&self.store).get_form(id)
    }

    pub fn forms_for_client(&self, client_id: &ClientId) -> Result<Vec<ConsentForm>> {
        locked(&self.store).forms_for_client(client_id)
    }

    /// Sign and render a completed form, file the PDF in the vault, and
    /// freeze the form. Returns the PDF's digest.
    #[instrument(skip(self, form, signature), fields(form_id = %form.id))]
    pub fn generate_consent_form(
        &self,
        form: &mut ConsentForm,
        signature: &SignatureStrokes,
        signer_name: &str,
    ) -> Result<String> {
        let missing = form.validate()?;
        if !missing.is_empty() {
            return Err(InkformError::FormNotReady(format!(
                "missing fields: {}",
                missing.join(", ")
            )));
        }
        if signature.is_blank() {
            return Err(InkformError::BlankSignature);
        }

        let (studio_name, paper_size) = {
            let config = locked(&self.config);
            (config.studio_name.clone(), config.default_paper_size)
        };

        let signed_at = Utc::now();
        let png = signature.render_png(SIGNATURE_WIDTH, SIGNATURE_HEIGHT)?;
        let request = RenderRequest::from_form(form, studio_name, png, signer_name, signed_at);
        let pdf = ConsentPdfRenderer::new(paper_size).render(&request)?;
        let hash = hash_bytes(&pdf);

        // The caller's form only changes once the generated copy is saved.
        let mut generated = form.clone();
        generated.mark_generated(signer_name, signed_at, hash.clone())?;
        {
            let store = locked(&self.store);
            self.vault.store(&pdf)?;
            if let Err(err) = store.save_form(&generated) {
                if !store.document_in_use(&hash).unwrap_or(true) {
                    if let Err(remove_err) = self.vault.remove(&hash) {
                        warn!(%hash, %remove_err, "could not remove unsaved consent PDF");
                    }
                }
                return Err(err);
            }
        }
        *form = generated;

        self.audit(
            AuditAction::FormGenerated,
            &form.id.to_string(),
            true,
            Some(&format!("{} signed by {signer_name}", form.form_type)),
        );
        info!(%hash, bytes = pdf.len(), "consent form generated");
        Ok(hash)
    }

    // -- Documents -----------------------------------------------------------

    /// Read a stored photo or PDF back out of the vault.
    pub fn load_document(&self, hash: &str) -> Result<Vec<u8>> {
        let result = self.vault.load(hash);
        self.audit(
            AuditAction::DocumentRead,
            hash,
            result.is_ok(),
            result.as_ref().err().map(ToString::to_string).as_deref(),
        );
        result
    }

    // -- Audit ---------------------------------------------------------------

    fn audit(&self, action: AuditAction, subject: &str, success: bool, details: Option<&str>) {
        if !locked(&self.config).audit_enabled {
            return;
        }
        if let Err(err) = locked(&self.audit_log).record(action, subject, success, details) {
            warn!(%err, action = action.as_str(), "audit log write failed");
        }
    }

    pub fn recent_audit_entries(&self, limit: u32) -> Result<Vec<AuditEntry>> {
        locked(&self.audit_log).recent_entries(limit)
    }

    pub fn audit_entries_for(&self, subject: &str) -> Result<Vec<AuditEntry>> {
        locked(&self.audit_log).entries_for_subject(subject)
    }

    pub fn audit_count(&self) -> Result<u64> {
        locked(&self.audit_log).count()
    }

    // -- Config --------------------------------------------------------------

    pub fn config(&self) -> AppConfig {
        locked(&self.config).clone()
    }

    /// Replace the settings and write them to `config.json`.
    pub fn save_config(&self, config: AppConfig) -> Result<()> {
        if let Some(dir) = &self.data_dir {
            data_dir::persist_config(dir, &config)?;
        }
        *locked(&self.config) = config;
        Ok(())
    }

    pub fn data_dir(&self) -> Option<&Path> {
        self.data_dir.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use image::{DynamicImage, GrayImage, ImageFormat, Luma};
    use inkform_core::types::{FormState, IdField};
    use inkform_scan::{NoRecognizer, RecognizedLine, RecognizedText};

    use super::*;

    struct ReadsLines(Vec<&'static str>);

    impl TextRecognizer for ReadsLines {
        fn recognize(&self, _image: &DynamicImage) -> Result<RecognizedText> {
            Ok(RecognizedText::from_lines(
                self.0.iter().map(|l| RecognizedLine::new(*l)).collect(),
            ))
        }
    }

    fn licence_lines() -> Vec<String> {
        ["Name: Jane Doe", "DOB: 01/01/1990", "ID NO: D1234567"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    fn card_photo() -> Vec<u8> {
        let image = GrayImage::from_fn(400, 260, |x, y| {
            if (x / 8 + y / 8) % 2 == 0 { Luma([20]) } else { Luma([230]) }
        });
        let mut buf = Vec::new();
        DynamicImage::ImageLuma8(image)
            .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .unwrap();
        buf
    }

    fn services() -> StudioServices {
        StudioServices::in_memory(AppConfig::default(), Arc::new(NoRecognizer)).unwrap()
    }

    fn signature() -> SignatureStrokes {
        let mut strokes = SignatureStrokes::new();
        strokes.begin_stroke(10.0, 40.0);
        strokes.extend_stroke(60.0, 10.0);
        strokes.extend_stroke(120.0, 45.0);
        strokes
    }

    fn client_with_ready_form(svc: &StudioServices) -> (ClientRecord, ConsentForm) {
        let scan = svc.scan_text(&licence_lines()).unwrap();
        let client = svc.create_client_from_scan(&scan).unwrap();
        let mut form = svc.new_consent_form(&client.id, FormType::Tattoo).unwrap();
        form.edit(|d| {
            d.artist_name = "Sam Reyes".into();
            d.procedure_description = "Fine-line swallow".into();
            d.body_location = "Left forearm".into();
            d.procedure_date = "2026-03-14".into();
        })
        .unwrap();
        (client, form)
    }

    #[test]
    fn text_scan_creates_linked_client() {
        let svc = services();
        let scan = svc.scan_text(&licence_lines()).unwrap();
        assert!(scan.outcome.is_success());

        let client = svc.create_client_from_scan(&scan).unwrap();
        assert_eq!(client.full_name, "JANE DOE");
        assert_eq!(client.id_number.as_deref(), Some("D1234567"));
        assert_eq!(svc.search_clients("jane").unwrap().len(), 1);
        assert_eq!(svc.audit_count().unwrap(), 2);
    }

    #[test]
    fn failed_scan_cannot_create_client() {
        let svc = services();
        let scan = svc.scan_text(&["NAME: JOHN".to_string()]).unwrap();
        assert!(!scan.outcome.is_success());
        assert!(matches!(
            svc.create_client_from_scan(&scan),
            Err(InkformError::ScanRejected(_))
        ));
        assert!(svc.all_clients().unwrap().is_empty());
    }

    #[test]
    fn photo_without_ocr_is_request_failed() {
        let svc = services();
        let scan = svc.scan_id(&card_photo()).unwrap();
        assert_eq!(
            scan.outcome.error_kind(),
            Some(inkform_core::types::ScanErrorKind::RequestFailed)
        );
        assert!(matches!(
            svc.load_document(&scan.image_hash),
            Err(InkformError::NotFound(_))
        ));
    }

    #[test]
    fn successful_photo_is_kept_in_vault() {
        let svc = StudioServices::in_memory(
            AppConfig::default(),
            Arc::new(ReadsLines(vec!["NAME: JANE DOE", "ID NO: D1234567"])),
        )
        .unwrap();
        let photo = card_photo();
        let scan = svc.scan_id(&photo).unwrap();
        assert_eq!(scan.outcome.extracted_info().get(IdField::Name), Some("JANE DOE"));
        assert_eq!(svc.load_document(&scan.image_hash).unwrap(), photo);
    }

    #[tokio::test]
    async fn async_scan_runs_off_thread() {
        let svc = services();
        let scan = svc.scan_id_async(b"not an image".to_vec()).await.unwrap();
        assert_eq!(
            scan.outcome.error_kind(),
            Some(inkform_core::types::ScanErrorKind::InvalidFormat)
        );
    }

    #[test]
    fn generate_freezes_form_and_files_pdf() {
        let svc = services();
        let (client, mut form) = client_with_ready_form(&svc);

        let hash = svc.generate_consent_form(&mut form, &signature(), "Jane Doe").unwrap();
        assert_eq!(form.state(), FormState::Generated);
        assert_eq!(form.document_hash.as_deref(), Some(hash.as_str()));

        let pdf = svc.load_document(&hash).unwrap();
        assert!(lopdf::Document::load_mem(&pdf).is_ok());

        let stored = svc.forms_for_client(&client.id).unwrap();
        assert!(stored[0].is_frozen());

        assert!(matches!(
            svc.generate_consent_form(&mut form, &signature(), "Jane Doe"),
            Err(InkformError::FormFrozen(_))
        ));
    }

    #[test]
    fn incomplete_form_is_not_ready() {
        let svc = services();
        let scan = svc.scan_text(&licence_lines()).unwrap();
        let client = svc.create_client_from_scan(&scan).unwrap();
        let mut form = svc.new_consent_form(&client.id, FormType::Piercing).unwrap();

        let err = svc
            .generate_consent_form(&mut form, &signature(), "Jane Doe")
            .unwrap_err();
        match err {
            InkformError::FormNotReady(msg) => assert!(msg.contains("artistName")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn blank_signature_is_refused() {
        let svc = services();
        let (_, mut form) = client_with_ready_form(&svc);
        assert!(matches!(
            svc.generate_consent_form(&mut form, &SignatureStrokes::new(), "Jane Doe"),
            Err(InkformError::BlankSignature)
        ));
        assert!(!form.is_frozen());
    }

    #[test]
    fn form_for_unknown_client_is_not_found() {
        let svc = services();
        assert!(matches!(
            svc.new_consent_form(&ClientId::new(), FormType::Tattoo),
            Err(InkformError::NotFound(_))
        ));
    }

    #[test]
    fn deleting_client_removes_documents() {
        let svc = services();
        let (client, mut form) = client_with_ready_form(&svc);
        let hash = svc.generate_consent_form(&mut form, &signature(), "Jane Doe").unwrap();

        assert!(svc.delete_client(&client.id).unwrap());
        assert!(svc.get_form(&form.id).unwrap().is_none());
        assert!(matches!(svc.load_document(&hash), Err(InkformError::NotFound(_))));
        assert!(!svc.delete_client(&client.id).unwrap());
    }

    #[test]
    fn shared_photo_survives_deleting_one_client() {
        let svc = StudioServices::in_memory(
            AppConfig::default(),
            Arc::new(ReadsLines(vec!["NAME: JANE DOE", "ID NO: D1234567"])),
        )
        .unwrap();
        let photo = card_photo();
        let first = svc.scan_id(&photo).unwrap();
        let second = svc.scan_id(&photo).unwrap();
        assert_eq!(first.image_hash, second.image_hash);

        let c1 = svc.create_client_from_scan(&first).unwrap();
        let c2 = svc.create_client_from_scan(&second).unwrap();

        assert!(svc.delete_client(&c1.id).unwrap());
        assert_eq!(svc.load_document(&second.image_hash).unwrap(), photo);

        assert!(svc.delete_client(&c2.id).unwrap());
        assert!(matches!(
            svc.load_document(&second.image_hash),
            Err(InkformError::NotFound(_))
        ));
    }

    #[test]
    fn stale_form_copy_is_left_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let svc = StudioServices::open(dir.path(), None, Arc::new(NoRecognizer)).unwrap();
        let (_, mut form) = client_with_ready_form(&svc);
        let mut stale = form.clone();

        svc.generate_consent_form(&mut form, &signature(), "Jane Doe").unwrap();
        let documents = || std::fs::read_dir(dir.path().join(DOCUMENTS_DIR)).unwrap().count();
        assert_eq!(documents(), 1);

        assert!(matches!(
            svc.generate_consent_form(&mut stale, &signature(), "Jane Doe"),
            Err(InkformError::FormFrozen(_))
        ));
        assert!(!stale.is_frozen());
        assert!(stale.document_hash.is_none());
        assert_eq!(documents(), 1);
        assert_eq!(svc.get_form(&form.id).unwrap().unwrap(), form);
    }

    #[test]
    fn audit_can_be_switched_off() {
        let config = AppConfig {
            audit_enabled: false,
            ..AppConfig::default()
        };
        let svc = StudioServices::in_memory(config, Arc::new(NoRecognizer)).unwrap();
        svc.scan_text(&licence_lines()).unwrap();
        assert_eq!(svc.audit_count().unwrap(), 0);
    }

    #[test]
    fn on_disk_studio_encrypts_and_reopens() {
        let dir = tempfile::tempdir().unwrap();
        let hash = {
            let svc = StudioServices::open(dir.path(), Some("tiger-lily"), Arc::new(NoRecognizer))
                .unwrap();
            let (_, mut form) = client_with_ready_form(&svc);
            svc.generate_consent_form(&mut form, &signature(), "Jane Doe").unwrap()
        };

        let stored = std::fs::read(dir.path().join(DOCUMENTS_DIR).join(&hash)).unwrap();
        assert!(inkform_security::storage::is_age_encrypted(&stored));

        let reopened =
            StudioServices::open(dir.path(), Some("tiger-lily"), Arc::new(NoRecognizer)).unwrap();
        assert_eq!(reopened.all_clients().unwrap().len(), 1);
        assert!(reopened.load_document(&hash).is_ok());
    }

    #[test]
    fn saved_config_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let svc = StudioServices::open(dir.path(), None, Arc::new(NoRecognizer)).unwrap();
        let config = AppConfig {
            studio_name: "Black Lotus".into(),
            ..svc.config()
        };
        svc.save_config(config).unwrap();

        let reopened = StudioServices::open(dir.path(), None, Arc::new(NoRecognizer)).unwrap();
        assert_eq!(reopened.config().studio_name, "Black Lotus");
    }
}
