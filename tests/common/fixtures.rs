//! Sample source documents for integration tests

/// arXiv API response for `cat:cs.AI` with five entries
pub const ARXIV_CS_AI: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom" xmlns:opensearch="http://a9.com/-/spec/opensearch/1.1/" xmlns:arxiv="http://arxiv.org/schemas/atom">
  <link href="http://arxiv.org/api/query?search_query%3Dcat%3Acs.AI" rel="self" type="application/atom+xml"/>
  <title type="html">ArXiv Query: search_query=cat:cs.AI&amp;id_list=&amp;start=0&amp;max_results=5</title>
  <id>http://arxiv.org/api/cHxbiOdZaP56ODnBPIenZhzg5f8</id>
  <updated>2024-03-04T00:00:00-05:00</updated>
  <opensearch:totalResults>41237</opensearch:totalResults>
  <opensearch:startIndex>0</opensearch:startIndex>
  <opensearch:itemsPerPage>5</opensearch:itemsPerPage>
  <entry>
    <id>http://arxiv.org/abs/2403.01001v1</id>
    <updated>2024-03-01T18:00:00Z</updated>
    <published>2024-03-01T18:00:00Z</published>
    <title>Planning with Language Models under
  Partial Observability</title>
    <summary>  We study planning agents that act in partially observable
environments using large language models as world models.
</summary>
    <author><name>Maria Rossi</name></author>
    <author><name>Kenji Tanaka</name></author>
    <link href="http://arxiv.org/abs/2403.01001v1" rel="alternate" type="text/html"/>
    <link title="pdf" href="http://arxiv.org/pdf/2403.01001v1" rel="related" type="application/pdf"/>
    <arxiv:primary_category xmlns:arxiv="http://arxiv.org/schemas/atom" term="cs.AI" scheme="http://arxiv.org/schemas/atom"/>
    <category term="cs.AI" scheme="http://arxiv.org/schemas/atom"/>
    <category term="cs.CL" scheme="http://arxiv.org/schemas/atom"/>
  </entry>
  <entry>
    <id>http://arxiv.org/abs/2403.01002v2</id>
    <updated>2024-03-02T09:15:00Z</updated>
    <published>2024-03-01T16:30:00Z</published>
    <title>Causal Discovery from Interventional Data at Scale</title>
    <summary>We propose a scalable method for causal structure learning.</summary>
    <author><name>Lena Fischer</name></author>
    <arxiv:doi>10.48550/arXiv.2403.01002</arxiv:doi>
    <link href="http://arxiv.org/abs/2403.01002v2" rel="alternate" type="text/html"/>
    <link title="pdf" href="http://arxiv.org/pdf/2403.01002v2" rel="related" type="application/pdf"/>
    <arxiv:primary_category xmlns:arxiv="http://arxiv.org/schemas/atom" term="cs.LG" scheme="http://arxiv.org/schemas/atom"/>
    <category term="cs.LG" scheme="http://arxiv.org/schemas/atom"/>
    <category term="cs.AI" scheme="http://arxiv.org/schemas/atom"/>
    <category term="stat.ML" scheme="http://arxiv.org/schemas/atom"/>
  </entry>
  <entry>
    <id>http://arxiv.org/abs/2403.01003v1</id>
    <updated>2024-03-01T14:00:00Z</updated>
    <published>2024-03-01T14:00:00Z</published>
    <title>Reward Models Are Not Enough</title>
    <summary>A position paper on alignment beyond reward modelling &amp; preference data.</summary>
    <author><name>Sam O'Neil</name></author>
    <author><name>Priya Nair</name></author>
    <author><name>Wei Zhang</name></author>
    <link href="http://arxiv.org/abs/2403.01003v1" rel="alternate" type="text/html"/>
    <link title="pdf" href="http://arxiv.org/pdf/2403.01003v1" rel="related" type="application/pdf"/>
    <arxiv:primary_category xmlns:arxiv="http://arxiv.org/schemas/atom" term="cs.AI" scheme="http://arxiv.org/schemas/atom"/>
    <category term="cs.AI" scheme="http://arxiv.org/schemas/atom"/>
  </entry>
  <entry>
    <id>http://arxiv.org/abs/2403.01004v1</id>
    <updated>2024-03-01T11:45:00Z</updated>
    <published>2024-03-01T11:45:00Z</published>
    <title>Symbolic Regression with Neural Guidance</title>
    <summary>Neural networks guide the search over expression trees.</summary>
    <author><name>Ana Costa</name></author>
    <link href="http://arxiv.org/abs/2403.01004v1" rel="alternate" type="text/html"/>
    <arxiv:primary_category xmlns:arxiv="http://arxiv.org/schemas/atom" term="cs.AI" scheme="http://arxiv.org/schemas/atom"/>
    <category term="cs.AI" scheme="http://arxiv.org/schemas/atom"/>
    <category term="cs.NE" scheme="http://arxiv.org/schemas/atom"/>
  </entry>
  <entry>
    <id>http://arxiv.org/abs/2403.01005v1</id>
    <updated>2024-03-01T08:00:00Z</updated>
    <published>2024-03-01T08:00:00Z</published>
    <title>Benchmarks for Multi-Agent Negotiation</title>
    <summary>We release a suite of negotiation environments for LLM agents.</summary>
    <author><name>Tom Becker</name></author>
    <author><name>Ines Duarte</name></author>
    <link href="http://arxiv.org/abs/2403.01005v1" rel="alternate" type="text/html"/>
    <link title="pdf" href="http://arxiv.org/pdf/2403.01005v1" rel="related" type="application/pdf"/>
    <arxiv:primary_category xmlns:arxiv="http://arxiv.org/schemas/atom" term="cs.MA" scheme="http://arxiv.org/schemas/atom"/>
    <category term="cs.MA" scheme="http://arxiv.org/schemas/atom"/>
    <category term="cs.AI" scheme="http://arxiv.org/schemas/atom"/>
  </entry>
</feed>
"#;

/// arXiv response with a single entry (no list wrapping)
pub const ARXIV_SINGLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom" xmlns:arxiv="http://arxiv.org/schemas/atom">
  <title type="html">ArXiv Query: id_list=1706.03762</title>
  <entry>
    <id>http://arxiv.org/abs/1706.03762v7</id>
    <updated>2023-08-02T00:41:18Z</updated>
    <published>2017-06-12T17:57:34Z</published>
    <title>Attention Is All You Need</title>
    <summary>The dominant sequence transduction models are based on complex recurrent or
convolutional neural networks.</summary>
    <author><name>Ashish Vaswani</name></author>
    <author><name>Noam Shazeer</name></author>
    <link href="http://arxiv.org/abs/1706.03762v7" rel="alternate" type="text/html"/>
    <link title="pdf" href="http://arxiv.org/pdf/1706.03762v7" rel="related" type="application/pdf"/>
    <arxiv:primary_category xmlns:arxiv="http://arxiv.org/schemas/atom" term="cs.CL" scheme="http://arxiv.org/schemas/atom"/>
    <category term="cs.CL" scheme="http://arxiv.org/schemas/atom"/>
    <category term="cs.LG" scheme="http://arxiv.org/schemas/atom"/>
  </entry>
</feed>
"#;

/// arXiv answer to a malformed query
pub const ARXIV_ERROR: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>ArXiv Query: search_query=&amp;id_list=&amp;start=-1</title>
  <entry>
    <id>http://arxiv.org/api/errors#start_must_be_non-negative</id>
    <title>Error</title>
    <summary>start must be non-negative</summary>
    <updated>2024-03-04T00:00:00-05:00</updated>
    <link href="http://arxiv.org/api/errors#start_must_be_non-negative" rel="alternate" type="text/html"/>
  </entry>
</feed>
"#;

/// RSS 2.0 feed with HTML descriptions
pub const RSS2_FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:dc="http://purl.org/dc/elements/1.1/">
  <channel>
    <title>Engineering Blog</title>
    <link>https://blog.example.org/</link>
    <description>Posts from the engineering team</description>
    <item>
      <title>Zero-copy parsing in practice</title>
      <link>https://blog.example.org/posts/zero-copy</link>
      <guid isPermaLink="true">https://blog.example.org/posts/zero-copy</guid>
      <description>&lt;p&gt;How we cut allocations &lt;em&gt;in half&lt;/em&gt;.&lt;/p&gt;&lt;p&gt;Details inside.&lt;/p&gt;</description>
      <pubDate>Mon, 04 Mar 2024 10:00:00 +0000</pubDate>
      <dc:creator>Ann Example</dc:creator>
      <category>Rust</category>
      <category>performance</category>
      <comments>https://blog.example.org/posts/zero-copy#comments</comments>
    </item>
    <item>
      <title>Release notes 2.4</title>
      <link>https://blog.example.org/posts/release-2-4</link>
      <description><![CDATA[<ul><li>Faster startup</li><li>New config format</li></ul>]]></description>
      <pubDate>Fri, 01 Mar 2024 08:30:00 GMT</pubDate>
      <enclosure url="https://blog.example.org/files/notes-2.4.pdf" length="12345" type="application/pdf"/>
      <category>release</category>
      <category>Rust</category>
      <category>rust</category>
    </item>
    <item>
      <title></title>
      <description></description>
    </item>
  </channel>
</rss>
"#;

/// Atom feed with typed text constructs
pub const ATOM_FEED: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Research Notes</title>
  <id>urn:uuid:60a76c80-d399-11d9-b93C-0003939e0af6</id>
  <updated>2024-03-03T18:30:02Z</updated>
  <entry>
    <title type="html">Sparse &lt;i&gt;attention&lt;/i&gt; revisited</title>
    <link rel="alternate" href="https://notes.example.org/sparse-attention"/>
    <link rel="enclosure" type="application/pdf" href="https://notes.example.org/sparse-attention.pdf"/>
    <id>urn:uuid:1225c695-cfb8-4ebb-aaaa-80da344efa6a</id>
    <published>2024-03-02T10:00:00Z</published>
    <updated>2024-03-03T18:30:02Z</updated>
    <summary type="html">&lt;p&gt;Revisiting block-sparse kernels.&lt;/p&gt;</summary>
    <author><name>R. Researcher</name></author>
    <category term="ml"/>
    <category term="kernels"/>
  </entry>
  <entry>
    <title>Notes without a summary</title>
    <link href="https://notes.example.org/no-summary"/>
    <id>urn:uuid:1225c695-cfb8-4ebb-bbbb-80da344efa6a</id>
    <updated>2024-03-01T12:00:00Z</updated>
    <content type="text">Plain content body.</content>
  </entry>
</feed>
"#;

/// GitHub `/search/repositories` response
pub const GITHUB_SEARCH: &str = r#"{
  "total_count": 2,
  "incomplete_results": false,
  "items": [
    {
      "id": 724712,
      "node_id": "MDEwOlJlcG9zaXRvcnk3MjQ3MTI=",
      "name": "rust",
      "full_name": "rust-lang/rust",
      "owner": {"login": "rust-lang", "id": 5430905},
      "html_url": "https://github.com/rust-lang/rust",
      "description": "Empowering everyone to build reliable and efficient software.",
      "homepage": "https://www.rust-lang.org",
      "created_at": "2010-06-16T20:39:03Z",
      "updated_at": "2024-03-04T10:00:00Z",
      "pushed_at": "2024-03-04T09:58:00Z",
      "stargazers_count": 92000,
      "language": "Rust",
      "topics": ["compiler", "language", "rust"]
    },
    {
      "id": 133442384,
      "node_id": "MDEwOlJlcG9zaXRvcnkxMzM0NDIzODQ=",
      "name": "tokio",
      "full_name": "tokio-rs/tokio",
      "owner": {"login": "tokio-rs", "id": 20248544},
      "html_url": "https://github.com/tokio-rs/tokio",
      "description": "A runtime for writing reliable asynchronous applications with Rust.",
      "homepage": null,
      "created_at": "2016-09-09T21:00:00Z",
      "updated_at": "2024-03-03T22:00:00Z",
      "stargazers_count": 24000,
      "language": "Rust",
      "topics": ["async", "networking"]
    }
  ]
}"#;

/// Stack Exchange `/questions?filter=withbody` response
pub const STACKOVERFLOW_QUESTIONS: &str = r#"{
  "items": [
    {
      "tags": ["rust", "tokio"],
      "owner": {"display_name": "J&#246;rg M."},
      "is_answered": true,
      "score": 12,
      "last_activity_date": 1709380800,
      "creation_date": 1709294400,
      "question_id": 78100001,
      "link": "https://stackoverflow.com/questions/78100001/spawn-blocking",
      "title": "When should I use spawn_blocking instead of &quot;block_in_place&quot;?",
      "body": "<p>I have a CPU-heavy task:</p><pre><code>let x = heavy();</code></pre><p>Which API fits?</p>"
    },
    {
      "tags": ["rust", "tokio", "channels"],
      "owner": {"display_name": "dev42"},
      "is_answered": false,
      "score": 3,
      "last_activity_date": 1709200000,
      "last_edit_date": 1709210000,
      "creation_date": 1709100000,
      "question_id": 78100002,
      "link": "https://stackoverflow.com/questions/78100002/mpsc-vs-broadcast",
      "title": "mpsc vs broadcast for fan-out",
      "body": "<p>Which channel should I use for fan-out?</p>"
    }
  ],
  "has_more": true,
  "quota_max": 300,
  "quota_remaining": 297
}"#;

/// Stack Exchange error document
pub const STACKOVERFLOW_ERROR: &str = r#"{
  "error_id": 502,
  "error_message": "too many requests from this IP, more requests available in 80 seconds",
  "error_name": "throttle_violation"
}"#;
