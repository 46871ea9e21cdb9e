use extrato_analytics::Analyzer;
use extrato_core::{Direction, ExtractedStatement, Money, PeriodKey, Tabular, Transaction};
use extrato_import::{CategoryTable, StatementPipeline, TransactionExtractor};

fn statements() -> Vec<ExtractedStatement> {
    vec![
        ExtractedStatement::from_text(
            "fev.txt",
            "Extrato fev/2025\n\
             Entradas (créditos)\nTotal 500,00\n\
             Saídas (débitos)\nTotal 300,00\n\
             03/02 PIX QRS MERCADO 120,00-\n\
             04/02 SAQUE BANCO24H 180,00-\n\
             05/02 DEP DIN 500,00",
        ),
        ExtractedStatement::from_text(
            "jan.txt",
            "Extrato jan/2025\n\
             Entradas (créditos)\nTotal 1.000,00\n\
             Saídas (débitos)\nTotal 800,00\n\
             03/01 PIX QRS MERCADO 300,00-\n\
             10/01 SISPAG FORNECEDOR ACME 500,00-\n\
             15/01 TED RECEBIDA 1.000,00",
        ),
        ExtractedStatement::failed("corrompido.pdf", "invalid xref table"),
    ]
}

fn pipeline() -> StatementPipeline {
    StatementPipeline::new(CategoryTable::default(), TransactionExtractor::with_fallback_year(2025))
}

#[test]
fn tables_do_not_depend_on_file_order() {
    let docs = statements();
    let mut reversed = statements();
    reversed.reverse();

    let a = pipeline().process(&docs);
    let b = pipeline().process(&reversed);
    let (xa, xb) = (
        Analyzer::new(&a.summaries, &a.transactions),
        Analyzer::new(&b.summaries, &b.transactions),
    );

    assert_eq!(xa.monthly_cash_flow(), xb.monthly_cash_flow());
    assert_eq!(xa.period_indicators(), xb.period_indicators());
    for direction in [Direction::Entry, Direction::Exit] {
        assert_eq!(xa.category_ranking(direction), xb.category_ranking(direction));
        assert_eq!(xa.monthly_category_ranking(direction), xb.monthly_category_ranking(direction));
        assert_eq!(xa.top_descriptions(direction, 50), xb.top_descriptions(direction, 50));
        assert_eq!(xa.pareto(direction), xb.pareto(direction));
    }
}

#[test]
fn repeated_calls_are_identical() {
    let out = pipeline().process(&statements());
    let analyzer = Analyzer::new(&out.summaries, &out.transactions);
    assert_eq!(analyzer.pareto(Direction::Exit), analyzer.pareto(Direction::Exit));
    assert_eq!(analyzer.net_result_series(), analyzer.net_result_series());
}

#[test]
fn batch_aggregates() {
    let out = pipeline().process(&statements());
    assert_eq!(out.failures.len(), 1);
    let analyzer = Analyzer::new(&out.summaries, &out.transactions);

    let flow = analyzer.monthly_cash_flow();
    let keys: Vec<String> = flow
        .rows
        .iter()
        .filter_map(|r| r.mes_key)
        .map(|k| k.to_string())
        .collect();
    assert_eq!(keys, ["2025-01", "2025-02"]);
    assert_eq!(flow.rows[0].resultado_liquido, Money::from_cents(20_000));

    let exits = analyzer.category_ranking(Direction::Exit);
    let names: Vec<&str> = exits.rows.iter().map(|r| r.category.as_str()).collect();
    assert_eq!(names, ["Fornecedores", "PIX", "Saques"]);
    assert_eq!(exits.rows[1].total, Money::from_cents(42_000));
    assert_eq!(exits.rows[1].count, 2);

    let top = analyzer.top_descriptions(Direction::Exit, 1);
    assert_eq!(top.rows[0].description, "SISPAG FORNECEDOR ACME");

    let pareto = analyzer.pareto(Direction::Exit);
    let last = pareto.rows.last().unwrap();
    assert_eq!(last.cumulative_percent.round_dp(0).to_string(), "100");
    assert_eq!(pareto.columns().len(), pareto.rows()[0].len());

    let monthly = analyzer.monthly_category_ranking(Direction::Exit);
    assert_eq!(monthly.rows.len(), 4);
    assert_eq!(monthly.rows[0].category, "Fornecedores");
}

#[test]
fn empty_batch_gives_empty_tables() {
    let analyzer = Analyzer::new(&[], &[]);
    assert!(analyzer.monthly_cash_flow().is_empty());
    assert!(analyzer.period_indicators().is_empty());
    assert!(analyzer.net_result_series().is_empty());
    assert!(analyzer.category_ranking(Direction::Exit).is_empty());
    assert!(analyzer.monthly_category_ranking(Direction::Entry).rows.is_empty());
    assert!(analyzer.top_descriptions(Direction::Entry, 10).rows.is_empty());
    assert!(analyzer.pareto(Direction::Exit).rows.is_empty());
}

#[test]
fn absurd_amounts_do_not_abort_aggregation() {
    let docs: Vec<ExtractedStatement> = (1..=10)
        .map(|i| {
            ExtractedStatement::from_text(
                format!("ruido{i}.txt"),
                "Extrato mar/2025\n\
                 Entradas (créditos)\nTotal 9.999.999.999.999.999.999.999.999.999,99\n\
                 05/03 PIX QRS 9.999.999.999.999.999.999.999.999.999,99\n\
                 06/03 PIX QRS LOJA 10,00-",
            )
        })
        .collect();
    let out = pipeline().process(&docs);
    let analyzer = Analyzer::new(&out.summaries, &out.transactions);

    assert!(analyzer.category_ranking(Direction::Entry).is_empty());
    assert!(analyzer.summaries().iter().all(|s| s.total_entries == Money::zero()));
    let exits = analyzer.category_ranking(Direction::Exit);
    assert_eq!(exits.rows[0].total, Money::from_cents(10_000));
    assert_eq!(analyzer.period_indicators().len(), 7);
}

#[test]
fn saturated_totals_still_rank() {
    let huge = Money::from_decimal(rust_decimal::Decimal::MAX);
    let tx = |description: &str| Transaction {
        file_id: "a.txt".into(),
        period: PeriodKey::new(2025, 3),
        date: "05/03/2025".into(),
        description: description.into(),
        entry: huge,
        exit: Money::zero(),
        balance: Money::zero(),
        category: Some("PIX".into()),
    };
    let transactions = [tx("PIX A"), tx("PIX B"), tx("PIX C")];
    let analyzer = Analyzer::new(&[], &transactions);

    let ranking = analyzer.category_ranking(Direction::Entry);
    assert_eq!(ranking.rows[0].total, huge);
    assert_eq!(ranking.rows[0].count, 3);
    assert_eq!(analyzer.pareto(Direction::Entry).rows.len(), 1);
}
