//! REST API Server for running user scripts
//!
//! This server exposes the script invoker over HTTP. Each run is
//! synchronous: the handler blocks until the script's child process exits.
//!
//! ## Endpoints
//!
//! POST /api/v1/invocations - Run a script
//! GET /api/v1/invocations - List invocation records
//! GET /api/v1/invocations/{id} - Get one record
//! DELETE /api/v1/invocations/{id} - Delete a record

use actix_web::{web, App, HttpResponse, HttpServer, Responder};
use chrono::{DateTime, Utc};
use script_runner::{Interpreter, Invoker, InvokerError, ScriptSource};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let state = web::Data::new(AppState::new());

    println!("Script Runner REST API Server starting on http://127.0.0.1:8080");
    println!("API Documentation available at http://127.0.0.1:8080/api/docs");

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .route("/health", web::get().to(health_check))
            .route("/api/docs", web::get().to(api_docs))
            .service(
                web::scope("/api/v1")
                    .route("/invocations", web::post().to(run_invocation))
                    .route("/invocations", web::get().to(list_invocations))
                    .route("/invocations/{id}", web::get().to(get_invocation))
                    .route("/invocations/{id}", web::delete().to(delete_invocation)),
            )
    })
    .bind("127.0.0.1:8080")?
    .run()
    .await
}

// ============ API Types ============

#[derive(Debug, Serialize, Deserialize)]
pub struct RunScriptRequest {
    /// Path to the script file (mutually exclusive with `code`)
    pub script_path: Option<String>,
    /// Script code to run directly (mutually exclusive with `script_path`)
    pub code: Option<String>,
    /// Interpreter name or path (default: system Python)
    pub interpreter: Option<String>,
    /// Arguments forwarded to the script
    pub args: Option<Vec<String>>,
    /// Extra environment variables
    pub env: Option<HashMap<String, String>>,
    /// Working directory
    pub cwd: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RunScriptResponse {
    pub id: String,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
    pub signal: Option<i32>,
    pub wall_time_ms: u64,
    pub success: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvocationRecord {
    pub id: String,
    pub script: String,
    pub interpreter: String,
    pub exit_code: i32,
    pub success: bool,
    pub wall_time_ms: u64,
    pub finished_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub message: String,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }

    fn error(message: impl Into<String>) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            message: message.into(),
            data: None,
        }
    }
}

// ============ Application State ============

pub struct AppState {
    invocations: Mutex<HashMap<String, InvocationRecord>>,
}

impl AppState {
    fn new() -> Self {
        Self {
            invocations: Mutex::new(HashMap::new()),
        }
    }
}

// ============ Handlers ============

/// Health check endpoint
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "script-runner-rs",
        "version": "0.1.0"
    }))
}

/// API documentation
async fn api_docs() -> impl Responder {
    let docs = r#"
# Script Runner REST API v1

## Endpoints

### Run Script
**POST /api/v1/invocations**

```json
{
  "script_path": "/mnt/jobs/report.py",
  "args": ["input.xlsx"],
  "env": {
    "DATA_DIR": "/mnt/data"
  }
}
```

Either `script_path` or `code` must be given, not both:

```json
{
  "code": "import pandas as pd; print(pd.__version__)"
}
```

The response carries the script's exit code and captured output:

```json
{
  "success": true,
  "message": "Script executed: /mnt/jobs/report.py",
  "data": {
    "id": "7a1d2c1e-5a3f-4a7b-9c1d-2e3f4a5b6c7d",
    "exit_code": 0,
    "stdout": "wrote report.xlsx\n",
    "stderr": "",
    "signal": null,
    "wall_time_ms": 184,
    "success": true
  }
}
```

### List Invocations
**GET /api/v1/invocations**

### Get Invocation
**GET /api/v1/invocations/{id}**

### Delete Invocation
**DELETE /api/v1/invocations/{id}**

## Pre-installed libraries
- pandas: Data manipulation and analysis
- openpyxl: Excel file reading and writing
- lxml: XML and HTML processing
- boto3: AWS SDK for Python

## Examples

### Run a mounted script
```bash
curl -X POST http://localhost:8080/api/v1/invocations \
  -H "Content-Type: application/json" \
  -d '{
    "script_path": "/mnt/jobs/report.py",
    "args": ["2026-07"]
  }'
```

### Run inline code
```bash
curl -X POST http://localhost:8080/api/v1/invocations \
  -H "Content-Type: application/json" \
  -d '{
    "code": "print(\"hi\")"
  }'
```
"#;
    HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body(docs)
}

/// Run a script and record the outcome
async fn run_invocation(
    req: web::Json<RunScriptRequest>,
    state: web::Data<AppState>,
) -> impl Responder {
    let script = match (&req.script_path, &req.code) {
        (Some(path), None) => ScriptSource::path(path),
        (None, Some(code)) => ScriptSource::inline(code.clone()),
        (Some(_), Some(_)) => {
            return HttpResponse::BadRequest().json(ApiResponse::<()>::error(
                "Give either script_path or code, not both",
            ));
        }
        (None, None) => {
            return HttpResponse::BadRequest().json(ApiResponse::<()>::error(
                "Either script_path or code is required",
            ));
        }
    };

    let interpreter = req
        .interpreter
        .as_deref()
        .map(Interpreter::new)
        .unwrap_or_default();
    let interpreter_name = interpreter.program().to_string();

    let mut builder = Invoker::builder().interpreter(interpreter);
    if let Some(env) = &req.env {
        for (key, value) in env {
            builder = builder.env(key.as_str(), value.as_str());
        }
    }
    if let Some(cwd) = &req.cwd {
        builder = builder.cwd(cwd);
    }
    let invoker = builder.build();

    let args = req.args.clone().unwrap_or_default();

    let result = match invoker.run(&script, &args) {
        Ok(result) => result,
        Err(e) => {
            let message = format!("Invocation failed: {}", e);
            return match e {
                InvokerError::ScriptNotFound(_)
                | InvokerError::NotAFile(_)
                | InvokerError::ScriptNotReadable(_, _)
                | InvokerError::InterpreterNotFound(_)
                | InvokerError::InvalidConfig(_) => {
                    HttpResponse::BadRequest().json(ApiResponse::<()>::error(message))
                }
                InvokerError::Io(_) | InvokerError::Launch(_) => {
                    HttpResponse::InternalServerError().json(ApiResponse::<()>::error(message))
                }
            };
        }
    };

    let id = Uuid::new_v4().to_string();

    let record = InvocationRecord {
        id: id.clone(),
        script: script.describe(),
        interpreter: interpreter_name,
        exit_code: result.exit_code,
        success: result.success(),
        wall_time_ms: result.wall_time_ms,
        finished_at: Utc::now(),
    };
    state
        .invocations
        .lock()
        .unwrap()
        .insert(id.clone(), record.clone());

    let response = RunScriptResponse {
        id,
        exit_code: result.exit_code,
        stdout: result.stdout_lossy().into_owned(),
        stderr: result.stderr_lossy().into_owned(),
        signal: result.signal,
        wall_time_ms: result.wall_time_ms,
        success: result.success(),
    };

    HttpResponse::Ok().json(ApiResponse::ok(
        format!("Script executed: {}", record.script),
        response,
    ))
}

/// List invocation records
async fn list_invocations(state: web::Data<AppState>) -> impl Responder {
    let invocations = state.invocations.lock().unwrap();
    let records: Vec<InvocationRecord> = invocations.values().cloned().collect();

    HttpResponse::Ok().json(ApiResponse::ok(
        format!("Found {} invocations", records.len()),
        records,
    ))
}

/// Get one invocation record
async fn get_invocation(id: web::Path<String>, state: web::Data<AppState>) -> impl Responder {
    let invocations = state.invocations.lock().unwrap();

    match invocations.get(id.as_str()) {
        Some(record) => HttpResponse::Ok().json(ApiResponse::ok("Invocation found", record.clone())),
        None => HttpResponse::NotFound().json(ApiResponse::<()>::error(format!(
            "Invocation not found: {}",
            id
        ))),
    }
}

/// Delete an invocation record
async fn delete_invocation(id: web::Path<String>, state: web::Data<AppState>) -> impl Responder {
    let mut invocations = state.invocations.lock().unwrap();

    match invocations.remove(id.as_str()) {
        Some(_) => HttpResponse::Ok().json(ApiResponse::ok(
            format!("Invocation deleted: {}", id),
            serde_json::json!({"id": id.as_str()}),
        )),
        None => HttpResponse::NotFound().json(ApiResponse::<()>::error(format!(
            "Invocation not found: {}",
            id
        ))),
    }
}
