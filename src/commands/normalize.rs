use nu_plugin::{EngineInterface, EvaluatedCall, PluginCommand};
use nu_protocol::{
    Category, Example, LabeledError, ListStream, PipelineData, Record, Signature, Signals,
    SyntaxShape, Type, Value,
};

use crate::algo::normalize::NormalizedForm;
use crate::CatmergePlugin;

use super::util;

pub struct Normalize;

impl PluginCommand for Normalize {
    type Plugin = CatmergePlugin;

    fn name(&self) -> &str {
        "catmerge normalize"
    }

    fn description(&self) -> &str {
        "Show the normalized form and significant words of category labels"
    }

    fn signature(&self) -> Signature {
        Signature::build(self.name())
            .input_output_types(vec![
                (Type::String, Type::table()),
                (Type::list(Type::String), Type::table()),
                (Type::table(), Type::table()),
            ])
            .named(
                "field",
                SyntaxShape::String,
                "Field containing the label when the input is a table (default: content)",
                Some('f'),
            )
            .category(Category::Experimental)
    }

    fn search_terms(&self) -> Vec<&str> {
        vec!["normalize", "label", "category", "words"]
    }

    fn examples(&self) -> Vec<Example<'_>> {
        vec![Example {
            example: r#"["Bill/Receipt" "HR & Payroll"] | catmerge normalize"#,
            description: "Normalize two raw labels",
            result: None,
        }]
    }

    fn run(
        &self,
        _plugin: &CatmergePlugin,
        _engine: &EngineInterface,
        call: &EvaluatedCall,
        input: PipelineData,
    ) -> Result<PipelineData, LabeledError> {
        let field: String = call
            .get_flag::<String>("field")?
            .unwrap_or_else(|| "content".into());
        let head = call.head;

        let rows = util::normalize_input(input, head);
        let results: Vec<Value> = rows
            .into_iter()
            .map(|row| {
                let label = row
                    .get_data_by_key(&field)
                    .and_then(|v| v.coerce_string().ok())
                    .unwrap_or_default();
                let form = NormalizedForm::of(&label);
                let words: Vec<Value> = form
                    .words
                    .into_iter()
                    .map(|w| Value::string(w, head))
                    .collect();

                let mut record = Record::new();
                record.push("label", Value::string(label, head));
                record.push("normalized", Value::string(form.normalized, head));
                record.push("words", Value::list(words, head));
                Value::record(record, head)
            })
            .collect();

        Ok(ListStream::new(results.into_iter(), head, Signals::empty()).into())
    }
}
