use nu_plugin::{EngineInterface, EvaluatedCall, PluginCommand};
use nu_protocol::{Category, Example, LabeledError, PipelineData, Signature, SyntaxShape, Type};

use crate::ops;
use crate::CatmergePlugin;

use super::util;

pub struct Consolidate;

impl PluginCommand for Consolidate {
    type Plugin = CatmergePlugin;

    fn name(&self) -> &str {
        "catmerge consolidate"
    }

    fn description(&self) -> &str {
        "Collapse near-duplicate category labels into a small set of folder names"
    }

    fn signature(&self) -> Signature {
        Signature::build(self.name())
            .input_output_types(vec![
                (Type::record(), Type::record()),
                (Type::record(), Type::table()),
                (Type::table(), Type::record()),
                (Type::table(), Type::table()),
            ])
            .switch(
                "explain",
                "Return one row per cluster with the rule that admitted each member",
                Some('e'),
            )
            .named(
                "synonyms",
                SyntaxShape::Filepath,
                "Synonym dictionary JSON (default: $CATMERGE_SYNONYMS, XDG file, or built-in)",
                Some('s'),
            )
            .named(
                "label-field",
                SyntaxShape::String,
                "Column holding the label when the input is a table (default: label)",
                None,
            )
            .named(
                "path-field",
                SyntaxShape::String,
                "Column holding the file path when the input is a table (default: path)",
                None,
            )
            .category(Category::Experimental)
    }

    fn search_terms(&self) -> Vec<&str> {
        vec!["consolidate", "merge", "category", "cluster", "dedup", "folders"]
    }

    fn examples(&self) -> Vec<Example<'_>> {
        vec![
            Example {
                example: r#"{Invoice: [a.pdf] invoices: [b.pdf] "Sales Report": [c.xlsx]} | catmerge consolidate"#,
                description: "Merge a label → paths record",
                result: None,
            },
            Example {
                example: r#"[[label path]; [Invoice_2024 a.pdf] [Receipt_2024 b.pdf]] | catmerge consolidate --explain"#,
                description: "Show which rule grouped each label",
                result: None,
            },
        ]
    }

    fn run(
        &self,
        _plugin: &CatmergePlugin,
        _engine: &EngineInterface,
        call: &EvaluatedCall,
        input: PipelineData,
    ) -> Result<PipelineData, LabeledError> {
        let explain = call.has_flag("explain")?;
        let synonyms: Option<String> = call.get_flag("synonyms")?;
        let label_field: String = call
            .get_flag::<String>("label-field")?
            .unwrap_or_else(|| "label".into());
        let path_field: String = call
            .get_flag::<String>("path-field")?
            .unwrap_or_else(|| "path".into());
        let head = call.head;

        let dictionary = util::dictionary_flag(synonyms, head)?;
        let mapping = util::input_to_mapping(input, &label_field, &path_field, head)?;

        let result = if explain {
            ops::op_explain(&mapping, &dictionary)
        } else {
            ops::op_consolidate(&mapping, &dictionary)
        }
        .map_err(|e| util::op_error(e, head))?;

        Ok(PipelineData::Value(util::json_to_value(result, head), None))
    }
}
