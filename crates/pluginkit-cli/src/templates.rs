//! Built-in stub templates, optionally overridden from a directory.

use std::path::Path;

use anyhow::{bail, Context, Result};
use pluginkit_core::{TemplateEngine, Vars};
use tracing::debug;

const OVERRIDE_EXTENSION: &str = ".tpl";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateKind {
    Command,
    Message,
    Nut,
    UnitTest,
}

impl TemplateKind {
    pub const ALL: [TemplateKind; 4] = [Self::Command, Self::Message, Self::Nut, Self::UnitTest];

    /// Registered template name; an override file is this plus `.tpl`.
    pub fn name(self) -> &'static str {
        match self {
            Self::Command => "command.ts",
            Self::Message => "message.md",
            Self::Nut => "command.nut.ts",
            Self::UnitTest => "command.test.ts",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Command => "command",
            Self::Message => "messages",
            Self::Nut => "nut",
            Self::UnitTest => "unit test",
        }
    }

    fn builtin(self) -> &'static str {
        match self {
            Self::Command => COMMAND_TS,
            Self::Message => MESSAGE_MD,
            Self::Nut => COMMAND_NUT_TS,
            Self::UnitTest => COMMAND_TEST_TS,
        }
    }

    fn from_override_file(file_name: &str) -> Option<Self> {
        let name = file_name.strip_suffix(OVERRIDE_EXTENSION)?;
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

/// Compiled templates for one generation run.
pub struct TemplateSet {
    engine: TemplateEngine,
}

impl TemplateSet {
    /// The built-in templates, replaced by any `*.tpl` files in `overrides_dir`.
    pub fn load(overrides_dir: Option<&Path>) -> Result<Self> {
        let mut engine = TemplateEngine::new();
        for kind in TemplateKind::ALL {
            engine.register(kind.name(), kind.builtin())?;
        }

        if let Some(dir) = overrides_dir {
            if !dir.is_dir() {
                bail!("template directory not found: {}", dir.display());
            }
            let entries = std::fs::read_dir(dir)
                .with_context(|| format!("reading template directory {}", dir.display()))?;
            for entry in entries {
                let path = entry?.path();
                let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
                    continue;
                };
                let Some(kind) = TemplateKind::from_override_file(file_name) else {
                    if file_name.ends_with(OVERRIDE_EXTENSION) {
                        debug!("ignoring unknown template {}", path.display());
                    }
                    continue;
                };
                let text = std::fs::read_to_string(&path)
                    .with_context(|| format!("reading template {}", path.display()))?;
                engine.register(kind.name(), &text)?;
                debug!("using template override {}", path.display());
            }
        }

        Ok(Self { engine })
    }

    pub fn render(&self, kind: TemplateKind, vars: &Vars) -> Result<String> {
        Ok(self.engine.render(kind.name(), vars)?)
    }
}

pub const COPYRIGHT_HEADER: &str = "\
/*
 * Copyright (c) {{year}}, {{holder}}
 * All rights reserved.
 * Licensed under the BSD 3-Clause license.
 * For full license text, see LICENSE.txt file in the repo root or https://opensource.org/licenses/BSD-3-Clause
 */

";

const COMMAND_TS: &str = "\
{{copyright}}import { SfCommand, Flags } from '@salesforce/sf-plugins-core';
import { Messages } from '@salesforce/core';

Messages.importMessagesDirectoryFromMetaUrl(import.meta.url);
const messages = Messages.loadMessages('{{pluginName}}', '{{messageFile}}');

export type {{returnType}} = {
  path: string;
};

export default class {{className}} extends SfCommand<{{returnType}}> {
  public static readonly summary = messages.getMessage('summary');
  public static readonly description = messages.getMessage('description');
  public static readonly examples = messages.getMessages('examples');

  public static readonly flags = {
    name: Flags.string({
      summary: messages.getMessage('flags.name.summary'),
      description: messages.getMessage('flags.name.description'),
      char: 'n',
      required: false,
    }),
  };

  public async run(): Promise<{{returnType}}> {
    const { flags } = await this.parse({{className}});

    const name = flags.name ?? 'world';
    this.log(`hello ${name} from {{commandPath}}`);
    return {
      path: '{{commandPath}}',
    };
  }
}
";

const MESSAGE_MD: &str = "\
# summary

Summary of a command.

# description

More information about a command. Don't repeat the summary.

# flags.name.summary

Description of a flag.

# flags.name.description

More information about a flag. Don't repeat the summary.

# examples

- <%= config.bin %> <%= command.id %>
";

const COMMAND_NUT_TS: &str = "\
{{copyright}}import { execCmd, TestSession } from '@salesforce/cli-plugins-testkit';
import { expect } from 'chai';

describe('{{cmd}} NUTs', () => {
  let session: TestSession;

  before(async () => {
    session = await TestSession.create({ devhubAuthStrategy: 'NONE' });
  });

  after(async () => {
    await session?.clean();
  });

  it('should display provided name', () => {
    const name = 'World';
    const command = `{{cmd}} --name ${name}`;
    const output = execCmd(command, { ensureExitCode: 0 }).shellOutput.stdout;
    expect(output).to.contain(name);
  });
});
";

const COMMAND_TEST_TS: &str = "\
{{copyright}}import { TestContext } from '@salesforce/core/testSetup';
import { expect } from 'chai';
import { stubSfCommandUx } from '@salesforce/sf-plugins-core';
import {{className}} from '{{importPath}}';

describe('{{cmd}}', () => {
  const $$ = new TestContext();
  let sfCommandStubs: ReturnType<typeof stubSfCommandUx>;

  beforeEach(() => {
    sfCommandStubs = stubSfCommandUx($$.SANDBOX);
  });

  afterEach(() => {
    $$.restore();
  });

  it('runs hello', async () => {
    await {{className}}.run([]);
    const output = sfCommandStubs.log
      .getCalls()
      .flatMap((c) => c.args)
      .join('\\n');
    expect(output).to.include('hello world');
  });

  it('runs hello with --json and no provided name', async () => {
    const result = await {{className}}.run([]);
    expect(result.path).to.equal('{{commandPath}}');
  });

  it('runs hello world --name Astro', async () => {
    await {{className}}.run(['--name', 'Astro']);
    const output = sfCommandStubs.log
      .getCalls()
      .flatMap((c) => c.args)
      .join('\\n');
    expect(output).to.include('hello Astro');
  });
});
";

#[cfg(test)]
mod tests {
    use super::*;
    use pluginkit_core::render;

    fn sample_vars() -> Vars {
        [
            ("copyright", ""),
            ("name", "do:awesome:stuff"),
            ("cmd", "do awesome stuff"),
            ("className", "DoAwesomeStuff"),
            ("returnType", "DoAwesomeStuffResult"),
            ("messageFile", "do.awesome.stuff"),
            ("pluginName", "my-plugin"),
            ("commandPath", "src/commands/do/awesome/stuff.ts"),
            ("importPath", "../../../../src/commands/do/awesome/stuff.js"),
            ("year", "2026"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    #[test]
    fn test_builtins_render() {
        let set = TemplateSet::load(None).unwrap();
        for kind in TemplateKind::ALL {
            assert!(set.render(kind, &sample_vars()).is_ok(), "{}", kind.name());
        }
    }

    #[test]
    fn test_command_template_content() {
        let set = TemplateSet::load(None).unwrap();
        let out = set.render(TemplateKind::Command, &sample_vars()).unwrap();
        assert!(out.starts_with("import { SfCommand"));
        assert!(out.contains("export default class DoAwesomeStuff extends SfCommand<DoAwesomeStuffResult>"));
        assert!(out.contains("this.log(`hello ${name} from src/commands/do/awesome/stuff.ts`);"));
    }

    #[test]
    fn test_message_template_keeps_oclif_markers() {
        let set = TemplateSet::load(None).unwrap();
        let out = set.render(TemplateKind::Message, &sample_vars()).unwrap();
        assert!(out.contains("- <%= config.bin %> <%= command.id %>"));
    }

    #[test]
    fn test_override_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("message.md.tpl"), "# summary\n\n{{cmd}}\n").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "{{ignored").unwrap();
        std::fs::write(dir.path().join("readme.tpl"), "{{ignored").unwrap();
        let set = TemplateSet::load(Some(dir.path())).unwrap();

        assert_eq!(
            set.render(TemplateKind::Message, &sample_vars()).unwrap(),
            "# summary\n\ndo awesome stuff\n"
        );
        // Kinds without an override fall back to the built-ins.
        let nut = set.render(TemplateKind::Nut, &sample_vars()).unwrap();
        assert!(nut.contains("describe('do awesome stuff NUTs'"));
    }

    #[test]
    fn test_override_with_unknown_placeholder_fails_to_render() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("message.md.tpl"), "# {{bogus}}").unwrap();
        let set = TemplateSet::load(Some(dir.path())).unwrap();
        assert!(set.render(TemplateKind::Message, &sample_vars()).is_err());
    }

    #[test]
    fn test_malformed_override_fails_to_load() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("command.ts.tpl"), "{{#if}}").unwrap();
        assert!(TemplateSet::load(Some(dir.path())).is_err());
    }

    #[test]
    fn test_missing_override_directory() {
        let dir = tempfile::tempdir().unwrap();
        let err = TemplateSet::load(Some(&dir.path().join("nope"))).err().unwrap();
        assert!(err.to_string().contains("template directory not found"));
    }

    #[test]
    fn test_copyright_header() {
        let vars: Vars = [("year", "2026"), ("holder", "Example Corp")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let header = render(COPYRIGHT_HEADER, &vars).unwrap();
        assert!(header.starts_with("/*\n * Copyright (c) 2026, Example Corp\n"));
        assert!(header.ends_with(" */\n\n"));
    }
}
