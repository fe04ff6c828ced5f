use nu_plugin::{EngineInterface, EvaluatedCall, PluginCommand};
use nu_protocol::{Category, Example, LabeledError, PipelineData, Signature, SyntaxShape, Type};

use crate::ops;
use crate::CatmergePlugin;

use super::util;

pub struct Organize;

impl PluginCommand for Organize {
    type Plugin = CatmergePlugin;

    fn name(&self) -> &str {
        "catmerge organize"
    }

    fn description(&self) -> &str {
        "Classify files under a directory, consolidate their categories, and copy them into category folders"
    }

    fn signature(&self) -> Signature {
        Signature::build(self.name())
            .input_output_types(vec![(Type::Nothing, Type::record())])
            .required(
                "source",
                SyntaxShape::Directory,
                "Directory holding the extracted files",
            )
            .named(
                "output",
                SyntaxShape::Directory,
                "Destination directory for category folders (default: ./organized)",
                Some('o'),
            )
            .named(
                "synonyms",
                SyntaxShape::Filepath,
                "Synonym dictionary JSON (default: $CATMERGE_SYNONYMS, XDG file, or built-in)",
                Some('s'),
            )
            .category(Category::Experimental)
    }

    fn search_terms(&self) -> Vec<&str> {
        vec!["organize", "sort", "folders", "category", "copy"]
    }

    fn examples(&self) -> Vec<Example<'_>> {
        vec![Example {
            example: r#"catmerge organize ./extracted --output ./sorted"#,
            description: "Sort every file in ./extracted into category folders under ./sorted",
            result: None,
        }]
    }

    fn run(
        &self,
        _plugin: &CatmergePlugin,
        _engine: &EngineInterface,
        call: &EvaluatedCall,
        _input: PipelineData,
    ) -> Result<PipelineData, LabeledError> {
        let source: String = call.req(0)?;
        let output: String = call
            .get_flag::<String>("output")?
            .unwrap_or_else(|| "./organized".into());
        let synonyms: Option<String> = call.get_flag("synonyms")?;
        let head = call.head;

        let dictionary = util::dictionary_flag(synonyms, head)?;
        let report = ops::op_organize(&source, &output, &dictionary)
            .map_err(|e| util::op_error(e, head))?;

        Ok(PipelineData::Value(util::json_to_value(report, head), None))
    }
}
