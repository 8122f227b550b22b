use comfy_table::{Cell, Table};
use kfgen_generator::framework::{self, FrameworkInfo};
use kfgen_generator::GeneratorConfig;

pub fn handle_frameworks_command(config: &GeneratorConfig) {
    println!("Namespace: {}", config.namespace);
    println!("{}", framework_table(&framework::all(config)));
}

fn framework_table(frameworks: &[FrameworkInfo]) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Framework", "Kind", "API Version", "Roles", "Container", "Image"]);

    for info in frameworks {
        table.add_row(vec![
            Cell::new(info.framework),
            Cell::new(&info.kind),
            Cell::new(&info.api_version),
            Cell::new(info.replica_types.join(", ")),
            Cell::new(&info.container.container_name),
            Cell::new(&info.container.image),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_row_per_framework() {
        let table = framework_table(&framework::all(&GeneratorConfig::default()));
        assert_eq!(table.row_iter().count(), 2);

        let rendered = table.to_string();
        assert!(rendered.contains("TFJob"));
        assert!(rendered.contains("PS, Worker"));
        assert!(rendered.contains("pytorch/pytorch:v0.2"));
    }
}
