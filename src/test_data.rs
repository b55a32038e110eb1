#[cfg(test)]
pub const POST_DATA_MD: &str = r#"---
title: "Get-ADObject with PSCX: MemberOf"
description: Group membership from PowerShell
date: 2017-06-30
updatedDate: '2017-07-02'
categories: dev
tags: [powershell, active-directory]
---

Finding the groups a user belongs to is **easy** with `Get-ADObject`.

> PSCX has to be installed first.
<!--more-->

## Installing PSCX

Run `Install-Module Pscx` from an elevated prompt.
"#;

#[cfg(test)]
pub const POST_DATA_NO_MORE: &str = r#"---
title: My MDX post
date: 2024-01-15 08:30:00
draft: true
tags:
  - mdx
  - "astro"
heroImage:
  src: ./hero.png
---
Full content, without an excerpt marker.
"#;

#[cfg(test)]
pub const CONFIG_DATA: &str = r#"
[site]
title = "Test Site"
description = "Test Description"
url = "https://example.com"

[paths]
content_dir = "res/content"

[server]
address = "127.0.0.1"
port = 4321
"#;
