//! Fake data helpers for REURB fixtures.
//!
//! Deterministic land-regularization values: UUIDs, resident names,
//! addresses around Macapá, tenure categories, dates.

use rand::Rng;

const FIRST_NAMES: &[&str] = &[
    "Ana", "Bruno", "Carla", "Daniel", "Elisa", "Fábio", "Gabriela", "Hugo", "Isabel", "João",
    "Karina", "Lucas", "Marta", "Nilton", "Otávio", "Paula", "Raimundo", "Sônia", "Tiago",
    "Vera",
];

const LAST_NAMES: &[&str] = &[
    "Silva", "Santos", "Oliveira", "Souza", "Pereira", "Costa", "Rodrigues", "Almeida",
    "Nascimento", "Lima", "Araújo", "Ferreira", "Carvalho", "Gomes", "Martins", "Barbosa",
];

const STREETS: &[&str] = &[
    "Rua Jovino Dinoá",
    "Avenida FAB",
    "Rua Leopoldo Machado",
    "Avenida Mendonça Furtado",
    "Rua Hamilton Silva",
    "Travessa Vereador Júlio Pereira",
    "Rua Eliézer Levy",
    "Avenida Padre Júlio",
];

const PROPERTY_STATUSES: &[&str] = &["pending", "in_review", "surveyed", "approved", "rejected"];

const TENURE_TYPES: &[&str] = &["propria", "cedida", "alugada", "ocupacao", "heranca"];

const LAND_SITUATIONS: &[&str] = &["regular", "irregular", "em_regularizacao"];

const REGISTRY_SITUATIONS: &[&str] = &["cadastrado", "pendente", "atualizar"];

const DOCUMENT_KINDS: &[&str] = &[
    "rg",
    "cpf",
    "comprovante_residencia",
    "contrato_compra_venda",
    "declaracao_posse",
];

const IMAGE_NAMES: &[&str] = &["fachada", "lateral", "fundos", "interior", "croqui"];

/// Fake data generator with deterministic RNG
pub struct FakeData<R: Rng> {
    rng: R,
}

impl<R: Rng> FakeData<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Random version-4 UUID in lowercase hex
    pub fn uuid(&mut self) -> String {
        let mut bytes = [0u8; 16];
        self.rng.fill(&mut bytes);
        bytes[6] = (bytes[6] & 0x0f) | 0x40;
        bytes[8] = (bytes[8] & 0x3f) | 0x80;

        let hex: String = bytes.iter().map(|b| format!("{:02x}", b)).collect();
        format!(
            "{}-{}-{}-{}-{}",
            &hex[0..8],
            &hex[8..12],
            &hex[12..16],
            &hex[16..20],
            &hex[20..32]
        )
    }

    pub fn full_name(&mut self) -> String {
        format!("{} {}", self.pick(FIRST_NAMES), self.pick(LAST_NAMES))
    }

    pub fn address(&mut self) -> String {
        let number: u32 = self.rng.random_range(1..2000);
        format!("{}, {}", self.pick(STREETS), number)
    }

    pub fn property_status(&mut self) -> &'static str {
        self.pick(PROPERTY_STATUSES)
    }

    pub fn tenure_type(&mut self) -> &'static str {
        self.pick(TENURE_TYPES)
    }

    pub fn land_situation(&mut self) -> &'static str {
        self.pick(LAND_SITUATIONS)
    }

    pub fn registry_situation(&mut self) -> &'static str {
        self.pick(REGISTRY_SITUATIONS)
    }

    /// One to three document kinds
    pub fn documents(&mut self) -> Vec<&'static str> {
        let count = self.rng.random_range(1..=3);
        (0..count).map(|_| self.pick(DOCUMENT_KINDS)).collect()
    }

    /// Zero to three photo file names
    pub fn images(&mut self, lot: usize) -> Vec<String> {
        let count = self.rng.random_range(0..=3);
        (0..count)
            .map(|i| format!("lote_{}_{}_{}.jpg", lot, self.pick(IMAGE_NAMES), i + 1))
            .collect()
    }

    /// Latitude/longitude near Macapá, six decimals
    pub fn coordinates(&mut self) -> (f64, f64) {
        let lat = self.rng.random_range(-0.0600..0.0600);
        let lon = self.rng.random_range(-51.1200..-51.0200);
        (round_to(lat, 6), round_to(lon, 6))
    }

    /// Area in square metres, two decimals
    pub fn area(&mut self, min: f64, max: f64) -> f64 {
        round_to(self.rng.random_range(min..max), 2)
    }

    pub fn registry_number(&mut self) -> String {
        let num: u32 = self.rng.random_range(10000..99999);
        format!("MAT-{}", num)
    }

    pub fn bool_with_probability(&mut self, probability: f64) -> bool {
        self.rng.random_bool(probability)
    }

    /// Datetime string with UTC offset, as Postgres dumps print timestamptz
    pub fn timestamp(&mut self, year_start: i32, year_end: i32) -> String {
        let year = self.rng.random_range(year_start..=year_end);
        let month = self.rng.random_range(1..=12);
        let day = self.rng.random_range(1..=28);
        let hour = self.rng.random_range(0..24);
        let minute = self.rng.random_range(0..60);
        let second = self.rng.random_range(0..60);
        format!(
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}+00",
            year, month, day, hour, minute, second
        )
    }

    pub fn date(&mut self, year_start: i32, year_end: i32) -> String {
        let year = self.rng.random_range(year_start..=year_end);
        let month = self.rng.random_range(1..=12);
        let day = self.rng.random_range(1..=28);
        format!("{:04}-{:02}-{:02}", year, month, day)
    }

    pub fn pick<T: Copy>(&mut self, items: &[T]) -> T {
        items[self.rng.random_range(0..items.len())]
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
