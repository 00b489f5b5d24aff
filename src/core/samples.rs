#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SampleKind {
    Positive,
    Negative,
    Neutral,
}

impl SampleKind {
    pub const ALL: [SampleKind; 3] = [SampleKind::Positive, SampleKind::Negative, SampleKind::Neutral];

    pub fn title(&self) -> &'static str {
        match self {
            SampleKind::Positive => "Positive review",
            SampleKind::Negative => "Negative review",
            SampleKind::Neutral => "Neutral review",
        }
    }

    pub fn text(&self) -> &'static str {
        match self {
            SampleKind::Positive => "Este producto superó mis expectativas. La calidad es excelente, el envío fue rápido y el servicio al cliente muy atento. Definitivamente lo recomiendo y volveré a comprar.",
            SampleKind::Negative => "Muy decepcionado con esta compra. El producto llegó dañado, la calidad es pésima y el servicio al cliente no respondió a mis quejas. No lo recomiendo para nada.",
            SampleKind::Neutral => "El producto está bien, cumple con lo básico. El precio es justo aunque podría mejorar en algunos aspectos. El envío fue dentro del tiempo esperado.",
        }
    }
}
