//! Built-in LoopBack application templates.
//!
//! [`all_templates`] returns the templates compiled into the binary followed
//! by any templates found under `$LOOPGEN_TEMPLATES_DIR`. Stores insert in
//! order, so a directory template with a built-in id replaces the built-in.
//!
//! ```env
//! LOOPGEN_TEMPLATES_DIR=./templates
//! ```
//!
//! `package.json`, `.yo-rc.json` and `server/component-config.json` depend on
//! the request rather than the template and are produced by the app service.

use std::path::Path;

use tracing::{debug, info, instrument, warn};

use loopgen_core::domain::{
    AppTemplateKind, DirectorySpec, DomainError, FileSpec, LoopbackVersion, TargetMatcher,
    Template, TemplateContent, TemplateId, TemplateMetadata, TemplateNode,
};

use crate::template_loader::FilesystemTemplateLoader;

/// Environment variable naming an extra template directory.
pub const TEMPLATES_DIR_ENV: &str = "LOOPGEN_TEMPLATES_DIR";

const BUILTIN_VERSION: &str = "1.0.0";

/// Built-in templates plus those under `$LOOPGEN_TEMPLATES_DIR`.
#[instrument]
pub fn all_templates() -> Result<Vec<Template>, DomainError> {
    let dir = std::env::var_os(TEMPLATES_DIR_ENV);
    templates_with_overlay(dir.as_deref().map(Path::new))
}

/// Built-in templates followed by the templates loaded from `dir`.
///
/// A missing or unreadable overlay directory is logged and ignored.
pub fn templates_with_overlay(dir: Option<&Path>) -> Result<Vec<Template>, DomainError> {
    let mut templates = builtin()?;

    if let Some(dir) = dir {
        debug!(path = %dir.display(), "checking template overlay directory");
        match FilesystemTemplateLoader::new(dir).load_all() {
            Ok(extra) => {
                info!(count = extra.len(), path = %dir.display(), "loaded templates");
                templates.extend(extra);
            }
            Err(e) => warn!(path = %dir.display(), error = %e, "ignoring template overlay"),
        }
    }

    Ok(templates)
}

/// Templates compiled into the binary, one per application kind.
pub fn builtin() -> Result<Vec<Template>, DomainError> {
    Ok(vec![api_server()?, empty_server()?, hello_world()?, notes()?])
}

fn api_server() -> Result<Template, DomainError> {
    let mut builder = Template::builder()
        .id(TemplateId::new("api-server", BUILTIN_VERSION))
        .matcher(
            TargetMatcher::builder()
                .kind(AppTemplateKind::ApiServer)
                .build(),
        )
        .metadata(metadata(AppTemplateKind::ApiServer, &["auth"]));

    for node in server_skeleton(DATASOURCES_DB, MODEL_CONFIG_AUTH) {
        builder = builder.add_node(node);
    }
    builder.build()
}

fn empty_server() -> Result<Template, DomainError> {
    let mut builder = Template::builder()
        .id(TemplateId::new("empty-server", BUILTIN_VERSION))
        .matcher(
            TargetMatcher::builder()
                .kind(AppTemplateKind::EmptyServer)
                .build(),
        )
        .metadata(metadata(AppTemplateKind::EmptyServer, &[]));

    for node in server_skeleton(DATASOURCES_EMPTY, MODEL_CONFIG_EMPTY) {
        builder = builder.add_node(node);
    }
    builder.build()
}

fn hello_world() -> Result<Template, DomainError> {
    let mut builder = Template::builder()
        .id(TemplateId::new("hello-world", BUILTIN_VERSION))
        .matcher(
            TargetMatcher::builder()
                .kind(AppTemplateKind::HelloWorld)
                .build(),
        )
        .metadata(metadata(AppTemplateKind::HelloWorld, &["example"]));

    for node in server_skeleton(DATASOURCES_EMPTY, MODEL_CONFIG_MESSAGE) {
        builder = builder.add_node(node);
    }
    builder
        .add_node(TemplateNode::Directory(DirectorySpec::new("common/models")))
        .add_node(literal("common/models/message.json", MESSAGE_MODEL))
        .add_node(literal("common/models/message.js", MESSAGE_SCRIPT))
        .build()
}

fn notes() -> Result<Template, DomainError> {
    let mut builder = Template::builder()
        .id(TemplateId::new("notes", BUILTIN_VERSION))
        .matcher(
            TargetMatcher::builder()
                .version(LoopbackVersion::V3)
                .kind(AppTemplateKind::Notes)
                .build(),
        )
        .metadata(metadata(AppTemplateKind::Notes, &["example", "memory"]));

    for node in server_skeleton(DATASOURCES_DB, MODEL_CONFIG_NOTE) {
        builder = builder.add_node(node);
    }
    builder
        .add_node(TemplateNode::Directory(DirectorySpec::new("common/models")))
        .add_node(literal("common/models/note.json", NOTE_MODEL))
        .build()
}

fn metadata(kind: AppTemplateKind, tags: &[&str]) -> TemplateMetadata {
    TemplateMetadata::new(kind.as_str())
        .description(kind.description())
        .version(BUILTIN_VERSION)
        .author("loopgen")
        .tags(tags.iter().map(|t| (*t).to_string()).collect())
}

fn literal(path: &'static str, content: &'static str) -> TemplateNode {
    TemplateNode::File(FileSpec::new(path, TemplateContent::Literal(content.into())))
}

/// Files every LoopBack server shares.
fn server_skeleton(datasources: &'static str, model_config: &'static str) -> Vec<TemplateNode> {
    vec![
        literal(".gitignore", GITIGNORE),
        TemplateNode::Directory(DirectorySpec::new("server")),
        TemplateNode::Directory(DirectorySpec::new("server/boot")),
        TemplateNode::Directory(DirectorySpec::new("client")),
        literal("server/config.json", SERVER_CONFIG),
        literal("server/datasources.json", datasources),
        literal("server/model-config.json", model_config),
        literal("server/middleware.json", MIDDLEWARE),
        literal("server/server.js", SERVER_JS),
        literal("server/boot/root.js", ROOT_JS),
        TemplateNode::File(FileSpec::new(
            "client/README.md",
            TemplateContent::Parameterized(CLIENT_README.into()),
        )),
    ]
}

// ── File contents ─────────────────────────────────────────────────────────────

const GITIGNORE: &str = "\
*.csv
*.dat
*.iml
*.log
*.out
*.pid
*.seed
*.sublime-*
*.swo
*.swp
*.tgz
*.xml
.DS_Store
.idea
.project
.strong-pm
coverage
node_modules
npm-debug.log
";

const SERVER_CONFIG: &str = r#"{
  "restApiRoot": "/api",
  "host": "0.0.0.0",
  "port": 3000,
  "remoting": {
    "context": false,
    "rest": {
      "handleErrors": false,
      "normalizeHttpPath": false,
      "xml": false
    },
    "json": {
      "strict": false,
      "limit": "100kb"
    },
    "urlencoded": {
      "extended": true,
      "limit": "100kb"
    },
    "cors": false
  }
}
"#;

const DATASOURCES_EMPTY: &str = "{}\n";

const DATASOURCES_DB: &str = r#"{
  "db": {
    "name": "db",
    "connector": "memory"
  }
}
"#;

const MODEL_CONFIG_EMPTY: &str = r#"{
  "_meta": {
    "sources": [
      "loopback/common/models",
      "loopback/server/models",
      "../common/models",
      "./models"
    ],
    "mixins": [
      "loopback/common/mixins",
      "loopback/server/mixins",
      "../common/mixins",
      "./mixins"
    ]
  }
}
"#;

const MODEL_CONFIG_AUTH: &str = r#"{
  "_meta": {
    "sources": [
      "loopback/common/models",
      "loopback/server/models",
      "../common/models",
      "./models"
    ],
    "mixins": [
      "loopback/common/mixins",
      "loopback/server/mixins",
      "../common/mixins",
      "./mixins"
    ]
  },
  "User": {
    "dataSource": "db"
  },
  "AccessToken": {
    "dataSource": "db",
    "public": false
  },
  "ACL": {
    "dataSource": "db",
    "public": false
  },
  "RoleMapping": {
    "dataSource": "db",
    "public": false
  },
  "Role": {
    "dataSource": "db",
    "public": false
  }
}
"#;

const MODEL_CONFIG_MESSAGE: &str = r#"{
  "_meta": {
    "sources": [
      "loopback/common/models",
      "loopback/server/models",
      "../common/models",
      "./models"
    ],
    "mixins": [
      "loopback/common/mixins",
      "loopback/server/mixins",
      "../common/mixins",
      "./mixins"
    ]
  },
  "Message": {
    "dataSource": null
  }
}
"#;

const MODEL_CONFIG_NOTE: &str = r#"{
  "_meta": {
    "sources": [
      "loopback/common/models",
      "loopback/server/models",
      "../common/models",
      "./models"
    ],
    "mixins": [
      "loopback/common/mixins",
      "loopback/server/mixins",
      "../common/mixins",
      "./mixins"
    ]
  },
  "Note": {
    "dataSource": "db"
  }
}
"#;

const MIDDLEWARE: &str = r#"{
  "initial:before": {
    "loopback#favicon": {}
  },
  "initial": {
    "compression": {},
    "cors": {
      "params": {
        "origin": true,
        "credentials": true,
        "maxAge": 86400
      }
    },
    "helmet#xssFilter": {},
    "helmet#frameguard": {
      "params": {
        "action": "deny"
      }
    },
    "helmet#hsts": {
      "params": {
        "maxAge": 0,
        "includeSubDomains": true
      }
    },
    "helmet#hidePoweredBy": {},
    "helmet#ieNoOpen": {},
    "helmet#noSniff": {},
    "helmet#noCache": {
      "enabled": false
    }
  },
  "session": {},
  "auth": {},
  "parse": {},
  "routes": {
    "loopback#rest": {
      "paths": [
        "${restApiRoot}"
      ]
    }
  },
  "files": {},
  "final": {
    "loopback#urlNotFound": {}
  },
  "final:after": {
    "strong-error-handler": {}
  }
}
"#;

const SERVER_JS: &str = r#"'use strict';

var loopback = require('loopback');
var boot = require('loopback-boot');

var app = module.exports = loopback();

app.start = function() {
  // start the web server
  return app.listen(function() {
    app.emit('started');
    var baseUrl = app.get('url').replace(/\/$/, '');
    console.log('Web server listening at: %s', baseUrl);
    if (app.get('loopback-component-explorer')) {
      var explorerPath = app.get('loopback-component-explorer').mountPath;
      console.log('Browse your REST API at %s%s', baseUrl, explorerPath);
    }
  });
};

// Bootstrap the application, configure models, datasources and middleware.
// Sub-apps like REST API are mounted via boot scripts.
boot(app, __dirname, function(err) {
  if (err) throw err;

  // start the server if `$ node server.js`
  if (require.main === module)
    app.start();
});
"#;

const ROOT_JS: &str = r#"'use strict';

module.exports = function(server) {
  // Install a `/` route that returns server status
  var router = server.loopback.Router();
  router.get('/', server.loopback.status());
  server.use(router);
};
"#;

const CLIENT_README: &str = "\
## Client

This is the place for your {{PROJECT_NAME}} application front-end files.
";

const MESSAGE_MODEL: &str = r#"{
  "name": "Message",
  "base": "Model",
  "properties": {},
  "methods": {
    "greet": {
      "isStatic": true,
      "accepts": [
        {
          "arg": "msg",
          "type": "string",
          "http": {
            "source": "query"
          }
        }
      ],
      "returns": {
        "arg": "greeting",
        "type": "string"
      },
      "http": {
        "verb": "get"
      }
    }
  }
}
"#;

const MESSAGE_SCRIPT: &str = r#"'use strict';

module.exports = function(Message) {
  Message.greet = function(msg, cb) {
    process.nextTick(function() {
      msg = msg || 'hello';
      cb(null, 'Sender says ' + msg + ' to receiver');
    });
  };
};
"#;

const NOTE_MODEL: &str = r#"{
  "name": "Note",
  "properties": {
    "title": {
      "type": "string",
      "required": true
    },
    "content": {
      "type": "string"
    }
  }
}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use loopgen_core::domain::AppTarget;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn builtin_templates_are_valid_json_documents() {
        for template in builtin().unwrap() {
            template.validate().unwrap();
            for node in &template.tree.nodes {
                if let TemplateNode::File(file) = node {
                    if file.path.as_str().ends_with(".json") {
                        let TemplateContent::Literal(source) = &file.content else {
                            panic!("{} should be literal", file.path);
                        };
                        serde_json::from_str::<serde_json::Value>(source.as_str())
                            .unwrap_or_else(|e| panic!("{}: {e}", file.path));
                    }
                }
            }
        }
    }

    #[test]
    fn notes_is_only_offered_for_loopback_3() {
        let templates = builtin().unwrap();
        let notes = templates
            .iter()
            .find(|t| t.id.name() == "notes")
            .unwrap();
        assert!(notes.matches(&AppTarget::parse("3.x", "notes").unwrap()));
        assert!(AppTarget::parse("2.x", "notes").is_err());
    }

    #[test]
    fn overlay_directory_appends_templates() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("api-server");
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join("template.toml"),
            r#"
[template]
id = "api-server"
version = "1.0.0"

[matcher]
kind = "api-server"

[metadata]
name = "acme api"
"#,
        )
        .unwrap();
        fs::write(dir.join("README.md"), "# {{PROJECT_NAME}}").unwrap();

        let templates = templates_with_overlay(Some(temp.path())).unwrap();
        assert_eq!(templates.len(), builtin().unwrap().len() + 1);
        assert_eq!(templates.last().unwrap().metadata.name, "acme api");
    }

    #[test]
    fn missing_overlay_is_ignored() {
        let temp = TempDir::new().unwrap();
        let templates = templates_with_overlay(Some(&temp.path().join("nope"))).unwrap();
        assert_eq!(templates.len(), 4);
    }
}
