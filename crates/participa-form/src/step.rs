//! Wizard steps.

use std::fmt;

use crate::FormError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Step {
    #[default]
    Home = 0,
    Identification = 1,
    Subject = 2,
    Channel = 3,
    Content = 4,
    Review = 5,
    Confirmation = 6,
}

impl Step {
    pub const ALL: [Step; 7] = [
        Step::Home,
        Step::Identification,
        Step::Subject,
        Step::Channel,
        Step::Content,
        Step::Review,
        Step::Confirmation,
    ];

    pub fn index(self) -> u8 {
        self as u8
    }

    /// Following step, saturating at Confirmation.
    pub fn next(self) -> Self {
        Self::ALL[(self.index() as usize + 1).min(Self::ALL.len() - 1)]
    }

    /// Preceding step, saturating at Home.
    pub fn prev(self) -> Self {
        Self::ALL[self.index().saturating_sub(1) as usize]
    }

    /// Steps whose draft is kept in durable storage.
    pub fn is_persisted(self) -> bool {
        (Step::Identification..=Step::Review).contains(&self)
    }

    pub fn title(self) -> &'static str {
        match self {
            Step::Home => "Início",
            Step::Identification => "Identificação",
            Step::Subject => "Assunto",
            Step::Channel => "Canal",
            Step::Content => "Conteúdo",
            Step::Review => "Revisão",
            Step::Confirmation => "Confirmação",
        }
    }

    /// Position in the progress bar (1-based), for steps that show one.
    /// Channel and Content share a slot.
    pub fn progress(self) -> Option<&'static FormStepInfo> {
        let id = match self {
            Step::Identification => 1,
            Step::Subject => 2,
            Step::Channel | Step::Content => 3,
            Step::Review => 4,
            Step::Home | Step::Confirmation => return None,
        };
        FORM_STEPS.iter().find(|s| s.id == id)
    }
}

impl TryFrom<u8> for Step {
    type Error = FormError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .get(value as usize)
            .copied()
            .ok_or(FormError::InvalidStep(value))
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Progress bar entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormStepInfo {
    pub id: u8,
    pub title: &'static str,
    pub description: &'static str,
}

pub const FORM_STEPS: [FormStepInfo; 4] = [
    FormStepInfo {
        id: 1,
        title: "Identificação",
        description: "Escolha como deseja se identificar",
    },
    FormStepInfo {
        id: 2,
        title: "Assunto",
        description: "Selecione o assunto da sua manifestação",
    },
    FormStepInfo {
        id: 3,
        title: "Canal",
        description: "Escolha como deseja enviar sua manifestação",
    },
    FormStepInfo {
        id: 4,
        title: "Revisão",
        description: "Confirme os dados antes de enviar",
    },
];

/// Progress percentage shown for `info`.
pub fn progress_percent(info: &FormStepInfo) -> u8 {
    (u32::from(info.id) * 100 / FORM_STEPS.len() as u32) as u8
}
