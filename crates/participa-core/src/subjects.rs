//! Subject catalog used to triage manifestations.
//!
//! The citizen picks a subject and the form suggests the agency responsible
//! for it. The catalog is compiled in and never changes at runtime.

use crate::normalize::fold_diacritics;

/// Catch-all subject for manifestations that fit no other category.
pub const FALLBACK_SUBJECT_ID: &str = "outro";

/// Minimum query length (in characters) for [`search_subjects`].
pub const MIN_SEARCH_LEN: usize = 2;

/// A subject category and the agency it routes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subject {
    pub id: &'static str,
    pub label: &'static str,
    pub keywords: &'static [&'static str],
    pub suggested_agency: &'static str,
}

pub const SUBJECT_CATEGORIES: &[Subject] = &[
    Subject {
        id: "saude",
        label: "Saúde",
        keywords: &[
            "hospital",
            "upa",
            "posto de saúde",
            "médico",
            "enfermeiro",
            "remédio",
            "medicamento",
            "vacina",
            "exame",
            "consulta",
            "atendimento médico",
            "emergência",
            "ambulância",
            "samu",
            "clínica",
            "dentista",
        ],
        suggested_agency: "Secretaria de Saúde do DF (SES-DF)",
    },
    Subject {
        id: "transito",
        label: "Trânsito e Transporte",
        keywords: &[
            "ônibus",
            "metrô",
            "brt",
            "transporte público",
            "semáforo",
            "trânsito",
            "buraco",
            "asfalto",
            "pista",
            "rodovia",
            "estacionamento",
            "multa",
            "detran",
            "carteira de motorista",
            "cnh",
            "placa",
            "sinalização",
        ],
        suggested_agency: "Secretaria de Transporte e Mobilidade (SEMOB-DF)",
    },
    Subject {
        id: "educacao",
        label: "Educação",
        keywords: &[
            "escola",
            "creche",
            "universidade",
            "professor",
            "aluno",
            "matrícula",
            "vaga",
            "merenda",
            "uniforme",
            "livro",
            "material escolar",
            "ensino",
            "faculdade",
            "educação infantil",
        ],
        suggested_agency: "Secretaria de Educação do DF (SEE-DF)",
    },
    Subject {
        id: "seguranca",
        label: "Segurança",
        keywords: &[
            "polícia",
            "segurança",
            "crime",
            "roubo",
            "furto",
            "assalto",
            "violência",
            "iluminação",
            "delegacia",
            "ocorrência",
            "patrulha",
            "viatura",
            "bombeiro",
            "incêndio",
        ],
        suggested_agency: "Secretaria de Segurança Pública do DF (SSP-DF)",
    },
    Subject {
        id: "servicos",
        label: "Serviços Públicos",
        keywords: &[
            "água",
            "luz",
            "esgoto",
            "lixo",
            "coleta",
            "limpeza",
            "calçada",
            "praça",
            "parque",
            "documento",
            "certidão",
            "na hora",
            "atendimento",
            "fila",
            "protocolo",
        ],
        suggested_agency: "Secretaria de Governo do DF (SEGOV-DF)",
    },
    Subject {
        id: "servidor",
        label: "Servidor Público",
        keywords: &[
            "servidor",
            "funcionário público",
            "atendimento ruim",
            "má conduta",
            "assédio",
            "corrupção",
            "abuso",
            "negligência",
            "descaso",
            "desrespeito",
        ],
        suggested_agency: "Controladoria-Geral do DF (CGDF)",
    },
    Subject {
        id: "meioambiente",
        label: "Meio Ambiente",
        keywords: &[
            "árvore",
            "poda",
            "queimada",
            "poluição",
            "rio",
            "lago",
            "animal",
            "fauna",
            "flora",
            "desmatamento",
            "lixo irregular",
            "entulho",
            "esgoto a céu aberto",
        ],
        suggested_agency: "Secretaria de Meio Ambiente do DF (SEMA-DF)",
    },
    Subject {
        id: FALLBACK_SUBJECT_ID,
        label: "Outro Assunto",
        keywords: &[],
        suggested_agency: "Ouvidoria-Geral do DF",
    },
];

/// Look up a subject by id.
pub fn subject_by_id(id: &str) -> Option<&'static Subject> {
    SUBJECT_CATEGORIES.iter().find(|s| s.id == id)
}

/// The catch-all subject.
pub fn fallback_subject() -> &'static Subject {
    // The catalog always ends with the catch-all entry.
    &SUBJECT_CATEGORIES[SUBJECT_CATEGORIES.len() - 1]
}

/// Find subjects whose label or any keyword contains `query`.
///
/// Comparison ignores case and accents. Queries shorter than
/// [`MIN_SEARCH_LEN`] characters return nothing.
pub fn search_subjects(query: &str) -> Vec<&'static Subject> {
    if query.chars().count() < MIN_SEARCH_LEN {
        return Vec::new();
    }

    let needle = fold_diacritics(query);
    SUBJECT_CATEGORIES
        .iter()
        .filter(|subject| {
            fold_diacritics(subject.label).contains(&needle)
                || subject
                    .keywords
                    .iter()
                    .any(|k| fold_diacritics(k).contains(&needle))
        })
        .collect()
}
