//! Keyword rule table used by the classifier.
//!
//! Several rules may point at the same subject: a short list of strong,
//! unambiguous phrases at a higher priority, and a broader list at a lower
//! one. Table order matters: it breaks score ties.

use participa_core::subjects::{Subject, subject_by_id};

/// A set of keywords that votes for one subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeywordRule {
    pub subject_id: &'static str,
    pub subject_label: &'static str,
    pub suggested_agency: &'static str,
    /// Keywords as written; normalised before matching.
    pub keywords: &'static [&'static str],
    /// Score multiplier, at least 1.
    pub priority: u32,
}

impl KeywordRule {
    /// The catalog entry this rule points at, if it exists.
    pub fn subject(&self) -> Option<&'static Subject> {
        subject_by_id(self.subject_id)
    }
}

const SAUDE: (&str, &str, &str) = ("saude", "Saúde", "Secretaria de Saúde do DF (SES-DF)");
const TRANSITO: (&str, &str, &str) = (
    "transito",
    "Trânsito e Transporte",
    "Secretaria de Transporte e Mobilidade (SEMOB-DF)",
);
const EDUCACAO: (&str, &str, &str) = (
    "educacao",
    "Educação",
    "Secretaria de Educação do DF (SEE-DF)",
);
const SEGURANCA: (&str, &str, &str) = (
    "seguranca",
    "Segurança",
    "Secretaria de Segurança Pública do DF (SSP-DF)",
);
const SERVICOS: (&str, &str, &str) = (
    "servicos",
    "Serviços Públicos",
    "Secretaria de Governo do DF (SEGOV-DF)",
);
const SERVIDOR: (&str, &str, &str) = (
    "servidor",
    "Servidor Público",
    "Controladoria-Geral do DF (CGDF)",
);
const MEIO_AMBIENTE: (&str, &str, &str) = (
    "meioambiente",
    "Meio Ambiente",
    "Secretaria de Meio Ambiente do DF (SEMA-DF)",
);

const fn rule(
    subject: (&'static str, &'static str, &'static str),
    priority: u32,
    keywords: &'static [&'static str],
) -> KeywordRule {
    KeywordRule {
        subject_id: subject.0,
        subject_label: subject.1,
        suggested_agency: subject.2,
        keywords,
        priority,
    }
}

/// Built-in rule table.
pub const KEYWORD_RULES: &[KeywordRule] = &[
    rule(
        SAUDE,
        2,
        &[
            "hospital",
            "upa",
            "posto de saúde",
            "médico",
            "médica",
            "enfermeiro",
            "enfermeira",
            "remédio",
            "medicamento",
            "vacina",
            "exame",
            "consulta",
            "cirurgia",
            "emergência",
            "ambulância",
            "samu",
            "clínica",
            "dentista",
            "saúde",
        ],
    ),
    rule(
        TRANSITO,
        2,
        &[
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
            "motorista",
        ],
    ),
    rule(
        EDUCACAO,
        2,
        &[
            "escola",
            "creche",
            "universidade",
            "professor",
            "professora",
            "aluno",
            "matrícula",
            "merenda",
            "uniforme",
            "livro",
            "material escolar",
            "ensino",
            "faculdade",
            "educação infantil",
            "sala de aula",
        ],
    ),
    rule(
        SEGURANCA,
        2,
        &[
            "polícia",
            "policial",
            "segurança",
            "crime",
            "roubo",
            "furto",
            "assalto",
            "violência",
            "delegacia",
            "ocorrência",
            "patrulha",
            "viatura",
            "bombeiro",
            "incêndio",
        ],
    ),
    rule(
        SERVIDOR,
        3,
        &[
            "atendimento ruim",
            "má conduta",
            "assédio",
            "corrupção",
            "propina",
            "funcionário público",
        ],
    ),
    rule(
        SERVIDOR,
        2,
        &[
            "servidor",
            "servidora",
            "abuso",
            "negligência",
            "descaso",
            "desrespeito",
            "grosseria",
        ],
    ),
    rule(
        MEIO_AMBIENTE,
        3,
        &[
            "esgoto a céu aberto",
            "lixo irregular",
            "desmatamento",
            "queimada",
        ],
    ),
    rule(
        MEIO_AMBIENTE,
        2,
        &[
            "árvore",
            "poda",
            "poluição",
            "rio",
            "lago",
            "animal",
            "fauna",
            "flora",
            "entulho",
        ],
    ),
    rule(
        SERVICOS,
        1,
        &[
            "água",
            "luz",
            "esgoto",
            "lixo",
            "coleta",
            "limpeza",
            "calçada",
            "praça",
            "parque",
            "iluminação pública",
            "documento",
            "certidão",
            "na hora",
            "atendimento",
            "fila",
            "protocolo",
        ],
    ),
];
