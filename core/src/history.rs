use std::collections::VecDeque;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::classification::{ClassificationResult, is_productive_category};
use crate::submission::SourceKind;

/// One past classification, as displayed in the history list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Category label of the result
    pub status: String,
    /// Suggested reply
    pub content: String,
    pub confidence: f64,
    pub is_urgent: bool,
    #[serde(alias = "type")]
    pub source_type: SourceKind,
}

impl HistoryEntry {
    pub fn from_result(result: &ClassificationResult, source_type: SourceKind) -> Self {
        Self {
            status: result.category.clone(),
            content: result.suggested_response.clone(),
            confidence: result.confidence,
            is_urgent: result.is_urgent,
            source_type,
        }
    }
}

/// Totals over a history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HistoryStats {
    pub total: usize,
    pub productive: usize,
    pub unproductive: usize,
}

/// Most-recent-first list of classifications. Unbounded unless a cap is set.
#[derive(Debug, Clone, Default)]
pub struct History {
    entries: VecDeque<HistoryEntry>,
    cap: Option<usize>,
}

impl History {
    /// `seed` is taken as already ordered most-recent-first.
    pub fn new(seed: Vec<HistoryEntry>, cap: Option<usize>) -> Self {
        let mut history = Self {
            entries: seed.into(),
            cap,
        };
        history.evict();
        history
    }

    pub fn prepend(&mut self, entry: HistoryEntry) {
        self.entries.push_front(entry);
        self.evict();
    }

    fn evict(&mut self) {
        if let Some(cap) = self.cap {
            self.entries.truncate(cap);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn to_vec(&self) -> Vec<HistoryEntry> {
        self.entries.iter().cloned().collect()
    }

    pub fn stats(&self) -> HistoryStats {
        stats_for(self.entries.iter())
    }
}

pub fn stats_for<'a>(entries: impl Iterator<Item = &'a HistoryEntry>) -> HistoryStats {
    entries.fold(HistoryStats::default(), |mut stats, entry| {
        stats.total += 1;
        if is_productive_category(&entry.status) {
            stats.productive += 1;
        } else {
            stats.unproductive += 1;
        }
        stats
    })
}

/// Read a JSON array of entries to seed a session with.
pub fn load_seed(path: &Path) -> Result<Vec<HistoryEntry>, String> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read file '{}': {e}", path.display()))?;
    serde_json::from_str(&raw)
        .map_err(|e| format!("Invalid history JSON in '{}': {e}", path.display()))
}

fn demo(status: &str, content: &str, confidence: f64, is_urgent: bool, source: SourceKind) -> HistoryEntry {
    HistoryEntry {
        status: status.to_string(),
        content: content.to_string(),
        confidence,
        is_urgent,
        source_type: source,
    }
}

/// Sample entries shown to a fresh session on the demo site.
pub fn demo_entries() -> Vec<HistoryEntry> {
    use SourceKind::{File, Text};

    vec![
        demo(
            "Improdutivo",
            "Feliz aniversário! Que você tenha um dia incrível cheio de alegrias! 🎉",
            0.25,
            false,
            Text,
        ),
        demo(
            "Improdutivo",
            "Feliz Natal e um próspero Ano Novo! Desejo muita paz e felicidade para você e sua família! 🎄",
            0.52,
            false,
            Text,
        ),
        demo(
            "Improdutivo",
            "Muito obrigado pela ajuda de ontem, foi fundamental para o projeto dar certo!",
            0.68,
            false,
            Text,
        ),
        demo(
            "Improdutivo",
            "Bom dia! Como foi o final de semana? Espero que tenha descansado bem!",
            0.9,
            false,
            Text,
        ),
        demo(
            "Improdutivo",
            "Parabéns pela promoção! Você merece muito esse reconhecimento! 👏",
            0.94,
            false,
            File,
        ),
        demo(
            "Produtivo",
            "URGENTE: Servidor principal fora do ar. Clientes não conseguem acessar o sistema. Preciso de suporte imediato!",
            0.98,
            true,
            Text,
        ),
        demo(
            "Produtivo",
            "EMERGÊNCIA: Vazamento detectado no laboratório. Evacuação imediata necessária. Contactar equipe de segurança.",
            0.99,
            true,
            Text,
        ),
        demo(
            "Produtivo",
            "Cliente VIP reportou falha crítica no sistema de pagamento. Prejuízo estimado em R$ 50k/hora. Ação imediata necessária.",
            0.96,
            true,
            File,
        ),
        demo(
            "Produtivo",
            "Reunião de planejamento estratégico agendada para terça-feira às 14h. Confirme presença até segunda-feira.",
            0.91,
            false,
            Text,
        ),
        demo(
            "Produtivo",
            "Relatório mensal de vendas enviado em anexo. Favor revisar os números da região Sul antes da apresentação.",
            0.87,
            false,
            File,
        ),
        demo(
            "Produtivo",
            "Atualização do projeto: Fase 1 concluída com sucesso. Iniciando Fase 2 conforme cronograma estabelecido.",
            0.89,
            false,
            Text,
        ),
        demo(
            "Produtivo",
            "Novo protocolo de segurança implementado. Todos os funcionários devem realizar o treinamento até o final do mês.",
            0.93,
            false,
            File,
        ),
        demo(
            "Produtivo",
            "Orçamento para Q4 aprovado. Liberação de recursos para novos projetos a partir de outubro.",
            0.85,
            false,
            Text,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(status: &str) -> HistoryEntry {
        HistoryEntry {
            status: status.to_string(),
            content: format!("reply for {status}"),
            confidence: 0.5,
            is_urgent: false,
            source_type: SourceKind::Text,
        }
    }

    #[test]
    fn prepend_puts_newest_first() {
        let mut history = History::new(vec![entry("seed")], None);
        history.prepend(entry("first"));
        history.prepend(entry("second"));

        let statuses: Vec<_> = history.iter().map(|e| e.status.as_str()).collect();
        assert_eq!(statuses, ["second", "first", "seed"]);
    }

    #[test]
    fn cap_evicts_oldest_entries() {
        let mut history = History::new(vec![entry("a"), entry("b"), entry("c")], Some(2));
        assert_eq!(history.len(), 2);

        history.prepend(entry("new"));
        let statuses: Vec<_> = history.iter().map(|e| e.status.as_str()).collect();
        assert_eq!(statuses, ["new", "a"]);
    }

    #[test]
    fn demo_stats_split_by_category() {
        let history = History::new(demo_entries(), None);
        assert_eq!(
            history.stats(),
            HistoryStats {
                total: 13,
                productive: 8,
                unproductive: 5,
            }
        );
    }

    #[test]
    fn seed_json_accepts_type_alias() {
        let raw = r#"[{"status":"Produtivo","content":"Ok","confidence":0.7,"is_urgent":true,"type":"file"}]"#;
        let entries: Vec<HistoryEntry> = serde_json::from_str(raw).expect("valid seed");
        assert_eq!(entries[0].source_type, SourceKind::File);
    }

    #[test]
    fn entry_mirrors_result_fields() {
        let result = ClassificationResult {
            category: "Improdutivo".to_string(),
            confidence: 0.88,
            suggested_response: "De nada!".to_string(),
            is_urgent: false,
        };
        assert_eq!(
            HistoryEntry::from_result(&result, SourceKind::Text),
            HistoryEntry {
                status: "Improdutivo".to_string(),
                content: "De nada!".to_string(),
                confidence: 0.88,
                is_urgent: false,
                source_type: SourceKind::Text,
            }
        );
    }
}
