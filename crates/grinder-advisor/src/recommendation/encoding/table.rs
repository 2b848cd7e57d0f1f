use super::super::questionnaire::Question;

const YES_NO: &[&str] = &["Sim", "Não"];

/// Known answers for one feature. A category encodes to its 1-based position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureCategories {
    pub feature: &'static str,
    pub categories: &'static [&'static str],
}

impl FeatureCategories {
    pub fn code(&self, answer: &str) -> Option<i64> {
        self.categories
            .iter()
            .position(|category| *category == answer)
            .map(|index| index as i64 + 1)
    }
}

/// Static answer codes shared by the training pipeline and the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodingTable {
    features: &'static [FeatureCategories],
}

static STANDARD_FEATURES: [FeatureCategories; 10] = [
    FeatureCategories {
        feature: "Para qual finalidade pretende usar o moedor?",
        categories: &["Industrial", "Comercial", "Doméstico"],
    },
    FeatureCategories {
        feature: "Quantos quilos precisa moer por minuto?",
        categories: &["Até 1Kg", "Até 6.5Kg", "Até 9Kg", "Acima de 10Kg"],
    },
    FeatureCategories {
        feature: "Qual é a voltagem que pretende utilizar?",
        categories: &["127V", "220V", "Trifásico"],
    },
    FeatureCategories {
        feature: "O que irá moer?",
        categories: &[
            "Embutidos",
            "Carne, Frango",
            "Diversos (Castanhas, Frutas, Graõs, Etc)",
        ],
    },
    FeatureCategories {
        feature: "Prefere modelo mais fácil de limpar?",
        categories: YES_NO,
    },
    FeatureCategories {
        feature: "Ruído é um fator importante?",
        categories: YES_NO,
    },
    FeatureCategories {
        feature: "O espaço físico é limitado?",
        categories: YES_NO,
    },
    FeatureCategories {
        feature: "Qual é a faixa de orçamento?",
        categories: &[
            "Até R$ 2,500,00",
            "Até R$ 15,000,00",
            "Acima de R$ 15,000,00",
        ],
    },
    FeatureCategories {
        feature: "Deseja função de remoagem?",
        categories: YES_NO,
    },
    FeatureCategories {
        feature: "Potência desejada",
        categories: &["Até 0,25kW", "Até 2,2kW", "Até 5,5kW", "Até 7,5kW"],
    },
];

impl EncodingTable {
    pub fn standard() -> Self {
        Self {
            features: &STANDARD_FEATURES,
        }
    }

    pub fn features(&self) -> &'static [FeatureCategories] {
        self.features
    }

    pub fn feature(&self, name: &str) -> Option<&'static FeatureCategories> {
        self.features.iter().find(|entry| entry.feature == name)
    }

    pub fn code(&self, feature: &str, answer: &str) -> Option<i64> {
        self.feature(feature).and_then(|entry| entry.code(answer))
    }

    pub fn covers(&self, question: Question) -> bool {
        self.feature(question.text()).is_some()
    }
}
