use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use std::sync::OnceLock;
use thiserror::Error;

use extrato_core::Transaction;

/// Category assigned when no rule matches.
pub const FALLBACK_CATEGORY: &str = "Outros";

#[derive(Debug, Error)]
pub enum RulesError {
    #[error("Failed to parse category table: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Failed to read category table: {0}")]
    Io(#[from] std::io::Error),
    #[error("Category '{0}' has an empty keyword")]
    EmptyKeyword(String),
    #[error("Category '{0}' is declared more than once")]
    DuplicateCategory(String),
}

/// One category and the lowercase substrings that select it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRule {
    pub name: String,
    pub keywords: Vec<String>,
}

impl CategoryRule {
    pub fn new(name: impl Into<String>, keywords: &[&str]) -> Self {
        Self {
            name: name.into(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }

    fn matches(&self, lower: &str) -> bool {
        self.keywords.iter().any(|k| lower.contains(k.as_str()))
    }
}

fn default_fallback() -> String {
    FALLBACK_CATEGORY.to_string()
}

/// Ordered keyword table. Declaration order is precedence: the first rule
/// with a keyword contained in the description wins.
///
/// ```toml
/// fallback = "Outros"
///
/// [[category]]
/// name = "PIX"
/// keywords = ["pix qrs", "pix"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTable {
    #[serde(default = "default_fallback")]
    fallback: String,
    #[serde(rename = "category", default)]
    rules: Vec<CategoryRule>,
}

impl CategoryTable {
    /// Builds a table, lowercasing every keyword.
    pub fn new(rules: Vec<CategoryRule>, fallback: impl Into<String>) -> Result<Self, RulesError> {
        let mut seen = HashSet::new();
        let mut normalized = Vec::with_capacity(rules.len());

        for rule in rules {
            if !seen.insert(rule.name.clone()) {
                return Err(RulesError::DuplicateCategory(rule.name));
            }
            if rule.keywords.iter().any(|k| k.is_empty()) {
                return Err(RulesError::EmptyKeyword(rule.name));
            }
            normalized.push(CategoryRule {
                keywords: rule.keywords.iter().map(|k| k.to_lowercase()).collect(),
                name: rule.name,
            });
        }

        Ok(Self { fallback: fallback.into(), rules: normalized })
    }

    /// Shared instance of the default table.
    pub fn builtin() -> &'static CategoryTable {
        static TABLE: OnceLock<CategoryTable> = OnceLock::new();
        TABLE.get_or_init(|| CategoryTable {
            fallback: default_fallback(),
            rules: default_rules(),
        })
    }

    pub fn from_toml(toml_content: &str) -> Result<Self, RulesError> {
        let raw: CategoryTable = toml::from_str(toml_content)?;
        Self::new(raw.rules, raw.fallback)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, RulesError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    pub fn rules(&self) -> &[CategoryRule] {
        &self.rules
    }

    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    pub fn categorize(&self, description: &str) -> &str {
        let lower = description.trim().to_lowercase();
        if lower.is_empty() {
            return &self.fallback;
        }
        self.rules
            .iter()
            .find(|rule| rule.matches(&lower))
            .map(|rule| rule.name.as_str())
            .unwrap_or(self.fallback.as_str())
    }

    /// Sets the category of every transaction. Running it twice gives the
    /// same result as running it once.
    pub fn categorize_all(&self, transactions: &mut [Transaction]) {
        for tx in transactions.iter_mut() {
            tx.category = Some(self.categorize(&tx.description).to_string());
        }
        let distinct: HashSet<_> = transactions
            .iter()
            .filter_map(|t| t.category.as_deref())
            .collect();
        tracing::info!(
            transactions = transactions.len(),
            categories = distinct.len(),
            "Transactions categorized"
        );
    }
}

impl Default for CategoryTable {
    fn default() -> Self {
        Self::builtin().clone()
    }
}

/// Number of transactions per category; uncategorized records count under
/// the table's fallback name.
pub fn category_counts(
    table: &CategoryTable,
    transactions: &[Transaction],
) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for tx in transactions {
        let name = tx.category.as_deref().unwrap_or(table.fallback());
        *counts.entry(name.to_string()).or_insert(0) += 1;
    }
    counts
}

fn default_rules() -> Vec<CategoryRule> {
    vec![
        CategoryRule::new("Fornecedores", &["sispag fornecedor", "fornecedor", "sispag"]),
        CategoryRule::new(
            "Tributos/Boletos",
            &[
                "trib",
                "cod barras",
                "codigo de barras",
                "trib municipal",
                "tributo",
                "boleto",
                "das",
                "darf",
                "gps",
                "inss",
            ],
        ),
        CategoryRule::new("PIX", &["pix qrs", "pix transf", "pix", "qr code"]),
        CategoryRule::new(
            "Cartões",
            &[
                "rede visa",
                "rede mast",
                "rede elo",
                "amex",
                "visa",
                "master",
                "mastercard",
                "american express",
                "cartao",
                "cartão",
                "adquirencia",
            ],
        ),
        CategoryRule::new(
            "Tarifas Bancárias",
            &[
                "tar pix",
                "tar ",
                "tarifa",
                "plano adapt",
                "pacote servicos",
                "pacote serviços",
                "manutencao",
                "manutenção",
                "anuidade",
            ],
        ),
        CategoryRule::new(
            "Débito Automático",
            &["business", "debito automatico", "débito automático", "deb autom", "deb aut"],
        ),
        CategoryRule::new("Saques", &["saque", "banco24h", "banco 24h", "saq"]),
        CategoryRule::new(
            "Depósitos",
            &["dep din", "dep disp", "c dep cheque", "deposito", "depósito", "cheque depositado"],
        ),
        CategoryRule::new(
            "Aplicações/Resgates",
            &[
                "aplic aut mais",
                "apl",
                "res",
                "rend pago",
                "aplicacao",
                "aplicação",
                "resgate",
                "rendimento",
                "investimento",
                "cdb",
                "lci",
                "lca",
            ],
        ),
        CategoryRule::new(
            "Transferências",
            &["transf", "ted", "doc", "transferencia", "transferência"],
        ),
        CategoryRule::new("Recebimentos", &["recebimento", "credito", "crédito", "receb"]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use extrato_core::Money;

    fn tx(desc: &str) -> Transaction {
        Transaction {
            file_id: "f".into(),
            period: None,
            date: "05/03/2025".into(),
            description: desc.into(),
            entry: Money::from_cents(100),
            exit: Money::zero(),
            balance: Money::zero(),
            category: None,
        }
    }

    #[test]
    fn pix_keyword_matches() {
        assert_eq!(CategoryTable::builtin().categorize("PIX QRS LOJA X"), "PIX");
    }

    #[test]
    fn unmatched_goes_to_fallback() {
        assert_eq!(CategoryTable::builtin().categorize("RANDOM TEXT"), FALLBACK_CATEGORY);
        assert_eq!(CategoryTable::builtin().categorize(""), FALLBACK_CATEGORY);
        assert_eq!(CategoryTable::builtin().categorize("   "), FALLBACK_CATEGORY);
    }

    #[test]
    fn first_category_in_order_wins() {
        // Contains both "sispag" and "pix": Fornecedores comes first.
        assert_eq!(CategoryTable::builtin().categorize("SISPAG PIX FORNECEDOR"), "Fornecedores");
        // "tar pix" would be a tariff, but PIX precedes it.
        assert_eq!(CategoryTable::builtin().categorize("TAR PIX ENVIADO"), "PIX");
    }

    #[test]
    fn short_keywords_match_inside_words() {
        // "das" inside "vendas" hits Tributos/Boletos.
        assert_eq!(CategoryTable::builtin().categorize("RECEB VENDAS"), "Tributos/Boletos");
        assert_eq!(CategoryTable::builtin().categorize("TED 237.1234"), "Transferências");
    }

    #[test]
    fn default_table_order() {
        let names: Vec<&str> = CategoryTable::builtin()
            .rules()
            .iter()
            .map(|r| r.name.as_str())
            .collect();
        assert_eq!(
            names,
            [
                "Fornecedores",
                "Tributos/Boletos",
                "PIX",
                "Cartões",
                "Tarifas Bancárias",
                "Débito Automático",
                "Saques",
                "Depósitos",
                "Aplicações/Resgates",
                "Transferências",
                "Recebimentos",
            ]
        );
    }

    #[test]
    fn categorize_all_is_idempotent() {
        let table = CategoryTable::default();
        let mut txs = vec![tx("PIX QRS LOJA"), tx("SAQUE BANCO24H"), tx("XYZ")];
        table.categorize_all(&mut txs);
        let first = txs.clone();
        table.categorize_all(&mut txs);
        assert_eq!(txs, first);
        assert_eq!(txs[0].category.as_deref(), Some("PIX"));
        assert_eq!(txs[1].category.as_deref(), Some("Saques"));
        assert_eq!(txs[2].category.as_deref(), Some("Outros"));
    }

    #[test]
    fn from_toml_keeps_order_and_lowercases() {
        let table = CategoryTable::from_toml(
            r#"
fallback = "Diversos"

[[category]]
name = "Aluguel"
keywords = ["ALUGUEL", "imobiliaria"]

[[category]]
name = "PIX"
keywords = ["pix"]
"#,
        )
        .unwrap();
        assert_eq!(table.fallback(), "Diversos");
        assert_eq!(table.rules()[0].keywords, ["aluguel", "imobiliaria"]);
        assert_eq!(table.categorize("PIX ALUGUEL MARCO"), "Aluguel");
        assert_eq!(table.categorize("nada"), "Diversos");
    }

    #[test]
    fn from_toml_default_fallback() {
        let table =
            CategoryTable::from_toml("[[category]]\nname = \"A\"\nkeywords = [\"a\"]\n").unwrap();
        assert_eq!(table.fallback(), FALLBACK_CATEGORY);
    }

    #[test]
    fn from_toml_rejects_bad_tables() {
        let dup = "[[category]]\nname = \"A\"\nkeywords = [\"x\"]\n\
                   [[category]]\nname = \"A\"\nkeywords = [\"y\"]\n";
        assert!(matches!(
            CategoryTable::from_toml(dup),
            Err(RulesError::DuplicateCategory(n)) if n == "A"
        ));

        let empty = "[[category]]\nname = \"B\"\nkeywords = [\"\"]\n";
        assert!(matches!(
            CategoryTable::from_toml(empty),
            Err(RulesError::EmptyKeyword(n)) if n == "B"
        ));

        assert!(matches!(
            CategoryTable::from_toml("[[category]\n"),
            Err(RulesError::Parse(_))
        ));
    }

    #[test]
    fn builtin_roundtrips_through_toml() {
        let text = CategoryTable::builtin().to_toml().unwrap();
        let table = CategoryTable::from_toml(&text).unwrap();
        assert_eq!(&table, CategoryTable::builtin());
    }

    #[test]
    fn from_path_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("categorias.toml");
        let content = "[[category]]\nname = \"Folha\"\nkeywords = [\"salario\"]\n";
        std::fs::write(&path, content).unwrap();
        let table = CategoryTable::from_path(&path).unwrap();
        assert_eq!(table.categorize("SALARIO MARCO"), "Folha");

        assert!(matches!(
            CategoryTable::from_path(dir.path().join("missing.toml")),
            Err(RulesError::Io(_))
        ));
    }

    #[test]
    fn counts_per_category() {
        let table = CategoryTable::builtin();
        let mut txs = vec![tx("PIX A"), tx("PIX B"), tx("SAQUE")];
        table.categorize_all(&mut txs);
        txs.push(tx("sem categoria"));
        let counts = category_counts(table, &txs);
        assert_eq!(counts.get("PIX"), Some(&2));
        assert_eq!(counts.get("Saques"), Some(&1));
        assert_eq!(counts.get("Outros"), Some(&1));
        assert!(category_counts(table, &[]).is_empty());
    }

    #[test]
    fn counts_use_the_table_fallback() {
        let table = CategoryTable::from_toml(
            "fallback = \"Diversos\"\n[[category]]\nname = \"PIX\"\nkeywords = [\"pix\"]\n",
        )
        .unwrap();
        let txs = vec![tx("PIX A"), tx("sem categoria")];
        let counts = category_counts(&table, &txs);
        assert_eq!(counts.get("Diversos"), Some(&2));
        assert_eq!(counts.get(FALLBACK_CATEGORY), None);
    }
}
