//! Builds the project → quadra → property tree.
//!
//! Generation is deterministic for a given seed and scale. The first two
//! projects always carry the Marabaixo 1 and Oiapoque identifiers so the
//! verifier's known-project breakdown has something to count.

use crate::fake::FakeData;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

pub const MARABAIXO_ID: &str = "52b2eaac-a079-4e3a-90c7-cc6be700d8d1";
pub const OIAPOQUE_ID: &str = "b9230dee-5a70-4710-a54b-0ac5154f554c";

const PROJECT_NAMES: &[&str] = &[
    "Marabaixo 1",
    "Oiapoque",
    "Laranjal do Jari",
    "Santana Central",
    "Mazagão Velho",
    "Porto Grande",
];

/// Generation scale presets
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scale {
    /// 2 projects, ~60 properties
    Small,
    /// 4 projects, ~1,000 properties
    Medium,
    /// 6 projects, ~12,000 properties
    Large,
}

impl Scale {
    pub fn projects(&self) -> usize {
        match self {
            Scale::Small => 2,
            Scale::Medium => 4,
            Scale::Large => 6,
        }
    }

    pub fn quadras_per_project(&self) -> usize {
        match self {
            Scale::Small => 3,
            Scale::Medium => 10,
            Scale::Large => 40,
        }
    }

    pub fn properties_per_quadra(&self) -> usize {
        match self {
            Scale::Small => 10,
            Scale::Medium => 25,
            Scale::Large => 50,
        }
    }
}

impl std::str::FromStr for Scale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "small" | "s" => Ok(Scale::Small),
            "medium" | "m" => Ok(Scale::Medium),
            "large" | "l" => Ok(Scale::Large),
            _ => Err(format!("Unknown scale: {}. Use small, medium, or large", s)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub description: String,
    pub created_at: String,
}

#[derive(Debug, Clone)]
pub struct Quadra {
    pub id: String,
    pub project_id: String,
    /// Quadra number, unique within its project
    pub number: usize,
    pub area: f64,
    pub created_at: String,
}

/// One `reurb_properties` row in physical column order
#[derive(Debug, Clone)]
pub struct Property {
    pub id: String,
    pub quadra_id: String,
    pub name: String,
    pub area: f64,
    pub description: String,
    pub latitude: f64,
    pub longitude: f64,
    pub status: &'static str,
    pub images: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
    pub address: String,
    pub tipo_posse: &'static str,
    pub situacao_fundiaria: &'static str,
    pub documentos_comprobatorios: Vec<&'static str>,
    pub historico_ocupacao: String,
    pub restricoes_ambientais: Option<String>,
    pub situacao_cadastral: &'static str,
    pub area_terreno: f64,
    pub area_construida: f64,
    pub matricula_imovel: Option<String>,
    pub data_ocupacao: String,
    pub possui_conflito: bool,
    pub descricao_conflito: Option<String>,
}

/// Generated fixture tree
#[derive(Debug, Clone, Default)]
pub struct ReurbData {
    pub projects: Vec<Project>,
    pub quadras: Vec<Quadra>,
    pub properties: Vec<Property>,
}

/// Dangling references to inject after generation
#[derive(Debug, Clone, Copy, Default)]
pub struct OrphanConfig {
    /// Quadras pointing at a project that does not exist
    pub quadras: usize,
    /// Properties pointing at a quadra that does not exist
    pub properties: usize,
}

pub struct Generator {
    fake: FakeData<ChaCha8Rng>,
    scale: Scale,
}

impl Generator {
    pub fn new(seed: u64, scale: Scale) -> Self {
        Self {
            fake: FakeData::new(ChaCha8Rng::seed_from_u64(seed)),
            scale,
        }
    }

    pub fn generate(&mut self) -> ReurbData {
        let mut data = ReurbData::default();

        for p in 0..self.scale.projects() {
            let id = match p {
                0 => MARABAIXO_ID.to_string(),
                1 => OIAPOQUE_ID.to_string(),
                _ => self.fake.uuid(),
            };
            let name = PROJECT_NAMES[p % PROJECT_NAMES.len()].to_string();
            data.projects.push(Project {
                description: format!("Regularização fundiária {}", name),
                created_at: self.fake.timestamp(2023, 2024),
                id,
                name,
            });
        }

        for project in &data.projects {
            for number in 1..=self.scale.quadras_per_project() {
                let quadra = Quadra {
                    id: self.fake.uuid(),
                    project_id: project.id.clone(),
                    number,
                    area: self.fake.area(2000.0, 12000.0),
                    created_at: self.fake.timestamp(2023, 2024),
                };
                data.quadras.push(quadra);
            }
        }

        let mut lot = 0;
        for q in 0..data.quadras.len() {
            let quadra_id = data.quadras[q].id.clone();
            for n in 1..=self.scale.properties_per_quadra() {
                lot += 1;
                let property = self.property(&quadra_id, n, lot);
                data.properties.push(property);
            }
        }

        data
    }

    /// Generate, then add dangling quadras and properties.
    pub fn generate_with_orphans(&mut self, orphans: OrphanConfig) -> ReurbData {
        let mut data = self.generate();

        for i in 0..orphans.quadras {
            let quadra = Quadra {
                id: self.fake.uuid(),
                project_id: self.fake.uuid(),
                number: 900 + i,
                area: self.fake.area(2000.0, 12000.0),
                created_at: self.fake.timestamp(2023, 2024),
            };
            data.quadras.push(quadra);
        }

        for i in 0..orphans.properties {
            let missing_quadra = self.fake.uuid();
            let property = self.property(&missing_quadra, 900 + i, 900_000 + i);
            data.properties.push(property);
        }

        data
    }

    fn property(&mut self, quadra_id: &str, number: usize, lot: usize) -> Property {
        let (latitude, longitude) = self.fake.coordinates();
        let area_terreno = self.fake.area(120.0, 600.0);
        let possui_conflito = self.fake.bool_with_probability(0.1);
        let owner = self.fake.full_name();

        Property {
            id: self.fake.uuid(),
            quadra_id: quadra_id.to_string(),
            name: format!("Lote {:02}", number),
            area: area_terreno,
            description: format!("Imóvel de {}", owner),
            latitude,
            longitude,
            status: self.fake.property_status(),
            images: self.fake.images(lot),
            created_at: self.fake.timestamp(2024, 2024),
            updated_at: self.fake.timestamp(2025, 2025),
            address: self.fake.address(),
            tipo_posse: self.fake.tenure_type(),
            situacao_fundiaria: self.fake.land_situation(),
            documentos_comprobatorios: self.fake.documents(),
            historico_ocupacao: format!("Ocupado por {} desde a década de 90", owner),
            restricoes_ambientais: self
                .fake
                .bool_with_probability(0.2)
                .then(|| "Área de preservação permanente".to_string()),
            situacao_cadastral: self.fake.registry_situation(),
            area_terreno,
            area_construida: self.fake.area(40.0, area_terreno),
            matricula_imovel: self
                .fake
                .bool_with_probability(0.5)
                .then(|| self.fake.registry_number()),
            data_ocupacao: self.fake.date(1985, 2015),
            possui_conflito,
            descricao_conflito: possui_conflito.then(|| "Divergência de limites com vizinho".to_string()),
        }
    }
}
