use crate::{ContentKind, GenerationResult};
use opentelemetry::trace::Status;
use tracing::{info_span, Span};
use tracing_opentelemetry::OpenTelemetrySpanExt;

/// Span covering one orchestration call across every backend attempt.
pub struct GenerationSpan {
    span: Span,
    attempts: i64,
}

impl GenerationSpan {
    pub fn new(kind: ContentKind, requested_model: Option<&str>) -> Self {
        let span = info_span!("slidegen.generate");
        span.set_attribute("gen_ai.operation.name", "generate_content");
        span.set_attribute("slidegen.content_kind", kind.as_str());
        if let Some(model) = requested_model {
            span.set_attribute("gen_ai.request.model", model.to_string());
        }

        Self { span, attempts: 0 }
    }

    pub fn span(&self) -> Span {
        self.span.clone()
    }

    pub fn on_attempt(&mut self) {
        self.attempts += 1;
    }

    pub fn on_end(&mut self, result: &GenerationResult) {
        self.span.set_attribute("slidegen.attempts", self.attempts);
        if result.success {
            self.span
                .set_attribute("gen_ai.provider.name", result.provider.clone());
            self.span
                .set_attribute("gen_ai.response.model", result.model.clone());
            if let Some(tokens) = result.tokens_used {
                self.span
                    .set_attribute("slidegen.tokens_used", i64::from(tokens));
            }
        } else {
            let message = result.error.clone().unwrap_or_default();
            self.span.set_attribute("exception.message", message.clone());
            self.span.set_status(Status::error(message));
        }
    }
}
