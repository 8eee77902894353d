use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, Row, Table};
use relsynth::{
    Operator, ProgramSet, PropertyCatalog, SearchReport, WitnessRegistry, WitnessResult,
};
use std::fmt::Display;

pub struct Formatter {}

impl Default for Formatter {
    fn default() -> Self {
        Self::new()
    }
}

impl Formatter {
    pub fn new() -> Self {
        Self {}
    }

    fn table(&self, headers: &[&str]) -> Table {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(Row::from(
            headers
                .iter()
                .map(|h| Cell::new(h).set_alignment(CellAlignment::Left))
                .collect::<Vec<_>>(),
        ));
        table
    }

    pub fn format_programs<P: Display>(&self, programs: &ProgramSet<P>, top: usize) -> String {
        let mut output = String::new();
        output.push_str(&format!("Found {} program(s)\n", programs.len()));

        let mut table = self.table(&["#", "Score", "Program"]);
        for (rank, ranked) in programs.iter().take(top).enumerate() {
            table.add_row(Row::from(vec![
                Cell::new(rank + 1).set_alignment(CellAlignment::Right),
                Cell::new(format!("{:.3}", ranked.score)).set_alignment(CellAlignment::Right),
                Cell::new(ranked.program.to_string()),
            ]));
        }
        output.push_str(&table.to_string());
        output.push('\n');
        output
    }

    pub fn format_report(&self, report: &SearchReport) -> String {
        let join = |names: &[String]| {
            if names.is_empty() {
                "-".to_string()
            } else {
                names.join(", ")
            }
        };

        let mut table = self.table(&["Search", ""]);
        table.add_row(Row::from(vec![
            "applicable".to_string(),
            join(&report.applicable),
        ]));
        let conflicts: Vec<String> = report
            .conflicts
            .iter()
            .map(|(a, b)| format!("{} × {}", a, b))
            .collect();
        table.add_row(Row::from(vec!["conflicts".to_string(), join(&conflicts)]));
        table.add_row(Row::from(vec![
            "skipped extensions".to_string(),
            report.skipped.to_string(),
        ]));
        let frontier: Vec<String> = report
            .final_frontier
            .iter()
            .map(|set| format!("{{{}}}", set.join(", ")))
            .collect();
        table.add_row(Row::from(vec![
            "final frontier".to_string(),
            join(&frontier),
        ]));
        table.add_row(Row::from(vec!["chosen".to_string(), join(&report.chosen)]));
        table.add_row(Row::from(vec![
            "oracle calls".to_string(),
            report.oracle_calls().to_string(),
        ]));
        if report.fell_back {
            table.add_row(Row::from(vec![
                "fell back".to_string(),
                "chosen combination failed; plain examples used".to_string(),
            ]));
        }
        let mut output = table.to_string();
        output.push('\n');
        output
    }

    pub fn format_inversion(&self, operator: Operator, slot: usize, result: &WitnessResult) -> String {
        let mut output = String::new();
        match result.candidates() {
            Some(spec) => {
                output.push_str(&format!("{} slot {}: feasible\n", operator, slot));
                let mut table = self.table(&["State", "Candidates"]);
                for (state, values) in spec.states() {
                    let candidates: Vec<String> = values.iter().map(ToString::to_string).collect();
                    table.add_row(Row::from(vec![state.to_string(), candidates.join("\n")]));
                }
                output.push_str(&table.to_string());
                output.push('\n');
            }
            None => {
                output.push_str(&format!("{} slot {}: infeasible", operator, slot));
                if let Some(reason) = result.reason() {
                    output.push_str(&format!(" ({})", reason));
                }
                output.push('\n');
            }
        }
        output
    }

    pub fn format_properties(&self, catalog: &PropertyCatalog) -> String {
        let mut table = self.table(&["Property", "Description"]);
        for property in catalog.iter() {
            table.add_row(Row::from(vec![property.name(), property.description()]));
        }
        let mut output = table.to_string();
        output.push('\n');
        output
    }

    pub fn format_operators(&self, registry: &WitnessRegistry) -> String {
        let mut table = self.table(&["Operator", "Domain", "Signature", "Rules"]);
        for operator in Operator::ALL {
            let params: Vec<String> = operator.params().iter().map(ToString::to_string).collect();
            let signature = format!("({}) -> {}", params.join(", "), operator.result());
            let rules: Vec<String> = registry
                .slots(operator)
                .into_iter()
                .map(|slot| match registry.dependencies(operator, slot) {
                    Some(deps) if !deps.is_empty() => {
                        let deps: Vec<String> = deps.iter().map(ToString::to_string).collect();
                        format!("slot {} after {}", slot, deps.join(", "))
                    }
                    _ => format!("slot {}", slot),
                })
                .collect();
            table.add_row(Row::from(vec![
                operator.to_string(),
                format!("{:?}", operator.domain()).to_lowercase(),
                signature,
                rules.join("\n"),
            ]));
        }
        let mut output = table.to_string();
        output.push('\n');
        output
    }
}
