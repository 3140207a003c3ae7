//! Servidor web Axum para o pós-processamento de menções NFL
//!
//! Rotas:
//! - `GET /health` — estado e tamanho do gazetteer
//! - `POST /postprocess` — pós-processa um lote de sentenças
//! - `GET /lookup?phrase=...` — consulta direta ao gazetteer
//! - `GET /demo-sentences` — sentenças de demonstração
//! - `GET /ws` — WebSocket com os eventos do pós-processamento

use std::sync::Arc;

use anyhow::Context;
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use nfl_core::{
    corpus::{demo_gazetteer, demo_sentences},
    gazetteer::normalize_text,
    mention::Mention,
    tokenizer::{reindex, tokenize, Token},
    PostprocessConfig, PostprocessEvent, PostprocessReport, Sentence, SentencePostprocessor,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Estado compartilhado da aplicação
struct AppState {
    postprocessor: SentencePostprocessor,
}

/// Uma sentença de entrada: já etiquetada pelo pipeline genérico, ou texto cru.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SentenceInput {
    Tagged {
        tokens: Vec<Token>,
        #[serde(default)]
        mentions: Vec<Mention>,
        #[serde(default)]
        doc_id: Option<String>,
    },
    Text {
        text: String,
        #[serde(default)]
        doc_id: Option<String>,
    },
}

impl SentenceInput {
    fn into_sentence(self) -> Sentence {
        match self {
            SentenceInput::Tagged {
                mut tokens,
                mentions,
                doc_id,
            } => {
                reindex(&mut tokens);
                let mut sentence = Sentence {
                    doc_id,
                    tokens,
                    mentions,
                };
                let dropped = sentence.retain_valid_mentions();
                if dropped > 0 {
                    warn!("{} menções fora dos limites da sentença descartadas", dropped);
                }
                // O texto de uma menção vem sempre dos seus tokens
                sentence.refresh_mention_texts();
                sentence
            }
            SentenceInput::Text { text, doc_id } => Sentence {
                doc_id,
                tokens: tokenize(&text),
                mentions: Vec::new(),
            },
        }
    }
}

#[derive(Deserialize)]
struct PostprocessRequest {
    sentences: Vec<SentenceInput>,
}

#[derive(Serialize)]
struct PostprocessResponse {
    sentences: Vec<Sentence>,
    report: PostprocessReport,
    processing_ms: u64,
}

#[derive(Deserialize)]
struct LookupParams {
    phrase: String,
}

#[derive(Serialize)]
struct LookupResponse {
    phrase: String,
    normalized: String,
    label: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match std::env::var("NFL_CONFIG") {
        Ok(path) => PostprocessConfig::load(&path).with_context(|| format!("lendo configuração {}", path))?,
        Err(_) => PostprocessConfig::default(),
    };

    let gazetteer = match config.gazetteer.load()? {
        Some(gazetteer) => gazetteer,
        None => {
            info!("Nenhum gazetteer configurado; usando o gazetteer de demonstração");
            demo_gazetteer(config.gazetteer.max_phrase_length)?
        }
    };

    let state = Arc::new(AppState {
        postprocessor: SentencePostprocessor::new(Arc::new(gazetteer), config),
    });

    let bind = std::env::var("NFL_BIND").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .with_context(|| format!("bind em {}", bind))?;
    info!("🏈 Servidor NFL iniciado em http://{}", bind);
    axum::serve(listener, app(state)).await?;
    Ok(())
}

fn app(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route("/postprocess", post(postprocess_handler))
        .route("/lookup", get(lookup_handler))
        .route("/demo-sentences", get(demo_sentences_handler))
        .route("/ws", get(ws_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "entries": state.postprocessor.gazetteer().len(),
    }))
}

/// Pós-processamento de um lote via HTTP POST (sem streaming)
async fn postprocess_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<PostprocessRequest>,
) -> impl IntoResponse {
    if req.sentences.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": "Nenhuma sentença enviada"})),
        )
            .into_response();
    }

    let start = std::time::Instant::now();
    let mut sentences: Vec<Sentence> = req.sentences.into_iter().map(SentenceInput::into_sentence).collect();

    // O pós-processamento é síncrono: roda fora do runtime
    let result = tokio::task::spawn_blocking(move || {
        let report = state.postprocessor.postprocess_document(&mut sentences);
        (sentences, report)
    })
    .await;

    match result {
        Ok((sentences, report)) => Json(PostprocessResponse {
            sentences,
            report,
            processing_ms: start.elapsed().as_millis() as u64,
        })
        .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({"error": e.to_string()})),
        )
            .into_response(),
    }
}

/// Consulta direta ao gazetteer
async fn lookup_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LookupParams>,
) -> impl IntoResponse {
    let normalized = normalize_text(&params.phrase);
    let label = state
        .postprocessor
        .gazetteer()
        .lookup(&normalized)
        .map(str::to_string);
    Json(LookupResponse {
        phrase: params.phrase,
        normalized,
        label,
    })
}

async fn demo_sentences_handler() -> impl IntoResponse {
    Json(demo_sentences())
}

/// Upgrade HTTP → WebSocket
async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_websocket(socket, state))
}

/// Cada mensagem é uma sentença (JSON); a resposta é a sequência de eventos.
///
/// O índice da sentença avança a cada mensagem da mesma conexão.
async fn handle_websocket(mut socket: WebSocket, state: Arc<AppState>) {
    info!("WebSocket conectado");
    let mut sentence_index = 0usize;

    while let Some(Ok(msg)) = socket.recv().await {
        match msg {
            Message::Text(text) => {
                let input = match serde_json::from_str::<SentenceInput>(&text) {
                    Ok(input) => input,
                    Err(e) => {
                        let error = serde_json::json!({"type": "Error", "data": {"message": e.to_string()}});
                        if socket.send(Message::Text(error.to_string())).await.is_err() {
                            return;
                        }
                        continue;
                    }
                };

                let index = sentence_index;
                sentence_index += 1;
                let (tx, rx) = std::sync::mpsc::channel::<PostprocessEvent>();
                let state_for_thread = Arc::clone(&state);

                let handle = tokio::task::spawn_blocking(move || {
                    let mut sentence = input.into_sentence();
                    state_for_thread
                        .postprocessor
                        .postprocess_streaming(&mut sentence, index, &tx);
                });
                let outcome = handle.await;

                // Coleta os eventos numa Vec (o Receiver não é Send)
                let events: Vec<PostprocessEvent> = rx.try_iter().collect();
                let mut frames: Vec<String> = events
                    .iter()
                    .filter_map(|event| serde_json::to_string(event).ok())
                    .collect();
                if let Err(e) = outcome {
                    warn!("Pós-processamento da sentença {} falhou: {}", index, e);
                    frames.push(task_error_frame(&e));
                }

                for json in frames {
                    if socket.send(Message::Text(json)).await.is_err() {
                        return; // cliente desconectou
                    }
                }
            }
            Message::Close(_) => {
                info!("WebSocket desconectado");
                return;
            }
            Message::Ping(payload) => {
                let _ = socket.send(Message::Pong(payload)).await;
            }
            _ => {}
        }
    }
}

/// Quadro `Error` enviado quando a tarefa de pós-processamento não termina.
fn task_error_frame(error: &tokio::task::JoinError) -> String {
    serde_json::json!({"type": "Error", "data": {"message": error.to_string()}}).to_string()
}
