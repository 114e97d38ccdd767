use std::io::Read;
use std::path::{Path, PathBuf};

use base64::{engine::general_purpose, Engine as _};
use tempfile::TempDir;
use wiremock::MockServer;

use salesforce_mcp::auth::SalesforceCredentials;
use salesforce_mcp::metadata::{DeployClient, MetadataPipeline, PipelineConfig};
use salesforce_mcp::rest::SalesforceRestClient;
use salesforce_mcp::SalesforceTools;

pub const API_VERSION: &str = "62.0";
pub const SESSION_ID: &str = "00Dxx0000000001!AQ4AQ.test";
pub const DEPLOY_PATH: &str = "/services/Soap/m/58.0";

pub const ACCEPTED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<soapenv:Envelope xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/" xmlns="http://soap.sforce.com/2006/04/metadata">
  <soapenv:Body>
    <deployResponse>
      <result>
        <done>false</done>
        <id>0Af5g00000ABCDeCAA</id>
        <state>Queued</state>
      </result>
    </deployResponse>
  </soapenv:Body>
</soapenv:Envelope>"#;

pub const INVALID_SESSION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<soapenv:Envelope xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/" xmlns:sf="http://soap.sforce.com/2006/04/metadata">
  <soapenv:Body>
    <soapenv:Fault>
      <faultcode>sf:INVALID_SESSION_ID</faultcode>
      <faultstring>INVALID_SESSION_ID: Invalid Session ID found in SessionHeader: Illegal Session</faultstring>
    </soapenv:Fault>
  </soapenv:Body>
</soapenv:Envelope>"#;

/// Tools wired to `server` for both REST and SOAP, with a fresh work dir.
pub struct Harness {
    pub server: MockServer,
    pub work_dir: TempDir,
    pub tools: SalesforceTools<SalesforceRestClient>,
}

impl Harness {
    pub async fn start() -> Self {
        Self::start_with_token(SESSION_ID).await
    }

    pub async fn start_with_token(token: &str) -> Self {
        let server = MockServer::start().await;
        let work_dir = TempDir::new().unwrap();

        let config = PipelineConfig::builder()
            .with_work_dir(work_dir.path())
            .with_keep_staging(true)
            .build();
        let client = DeployClient::new(&config)
            .unwrap()
            .with_endpoint(format!("{}{}", server.uri(), DEPLOY_PATH));
        let pipeline = MetadataPipeline::new(config)
            .unwrap()
            .with_deploy_client(client);

        let credentials = SalesforceCredentials::new(server.uri(), token, API_VERSION);
        let session = SalesforceRestClient::new(credentials).unwrap();

        Self {
            server,
            work_dir,
            tools: SalesforceTools::new(session, pipeline),
        }
    }

    pub fn rest_path(&self, resource: &str) -> String {
        format!("/services/data/v{}/{}", API_VERSION, resource)
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.work_dir.path().join("logs")
    }

    /// Staging directories kept under the work dir.
    pub fn staged_dirs(&self) -> Vec<PathBuf> {
        let staging = self.work_dir.path().join("staging");
        let Ok(entries) = std::fs::read_dir(staging) else {
            return Vec::new();
        };
        let mut dirs: Vec<PathBuf> = entries
            .map(|e| e.unwrap().path())
            .filter(|p| p.is_dir())
            .collect();
        dirs.sort();
        dirs
    }

    /// The single SOAP request the server received, decoded.
    pub async fn deployed_archive(&self) -> Archive {
        let requests = self.server.received_requests().await.unwrap();
        let deploys: Vec<_> = requests
            .iter()
            .filter(|r| r.url.path() == DEPLOY_PATH)
            .collect();
        assert_eq!(deploys.len(), 1, "expected exactly one deploy request");

        let body = String::from_utf8(deploys[0].body.clone()).unwrap();
        let encoded = between(&body, "<met:ZipFile>", "</met:ZipFile>");
        Archive {
            envelope: body.clone(),
            bytes: general_purpose::STANDARD.decode(encoded).unwrap(),
        }
    }
}

/// A deployed zip plus the envelope that carried it.
pub struct Archive {
    pub envelope: String,
    pub bytes: Vec<u8>,
}

impl Archive {
    pub fn entry_names(&self) -> Vec<String> {
        let archive = zip::ZipArchive::new(std::io::Cursor::new(&self.bytes)).unwrap();
        let mut names: Vec<String> = archive.file_names().map(str::to_string).collect();
        names.sort();
        names
    }

    pub fn read(&self, name: &str) -> String {
        let mut archive = zip::ZipArchive::new(std::io::Cursor::new(&self.bytes)).unwrap();
        let mut contents = String::new();
        archive
            .by_name(name)
            .unwrap()
            .read_to_string(&mut contents)
            .unwrap();
        contents
    }
}

pub fn between<'a>(text: &'a str, start: &str, end: &str) -> &'a str {
    let from = text.find(start).unwrap() + start.len();
    let to = from + text[from..].find(end).unwrap();
    &text[from..to]
}

pub fn read_log(dir: &Path, name: &str) -> String {
    std::fs::read_to_string(dir.join(name)).unwrap_or_default()
}
